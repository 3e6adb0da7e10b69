use egui::{Pos2, Rect};

/// Where a dragged window would attach relative to a dock space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockZone {
    /// The pointer is outside the dock space.
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl DockZone {
    pub const ALL: [Self; 10] = [
        Self::None,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::Center,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Top | Self::Bottom)
    }

    /// Zones that land on the left/first side of a split.
    pub fn is_leading(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Zones that land on the right/second side of a split.
    pub fn is_trailing(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }
}

/// Normalized threshold for the edge zones.
pub const ZONE_EDGE_THRESHOLD: f32 = 0.25;

/// Normalized threshold for the corner zones.
pub const ZONE_CORNER_THRESHOLD: f32 = 0.25;

/// Normalized thresholds used by [`ZoneThresholds::detect`].
///
/// Both values are fractions of the dock space size, measured inwards from each border.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ZoneThresholds {
    pub edge: f32,
    pub corner: f32,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            edge: ZONE_EDGE_THRESHOLD,
            corner: ZONE_CORNER_THRESHOLD,
        }
    }
}

impl ZoneThresholds {
    /// Map `pointer` to a zone of `dock_rect`.
    ///
    /// Corners are checked before edges, so a pointer that satisfies both a corner and an edge
    /// threshold always resolves to the corner. Comparisons are strict and there is no hysteresis:
    /// a pointer sitting exactly on a threshold falls through to the next check.
    ///
    /// Points on the border of `dock_rect` are inside. Degenerate rects (zero, negative or
    /// non-finite size) never contain anything.
    pub fn detect(self, pointer: Pos2, dock_rect: Rect) -> DockZone {
        let size = dock_rect.size();
        if !(size.x > 0.0 && size.y > 0.0) || !size.is_finite() || !pointer.is_finite() {
            return DockZone::None;
        }

        let n = (pointer - dock_rect.min) / size;
        if n.x < 0.0 || n.x > 1.0 || n.y < 0.0 || n.y > 1.0 {
            return DockZone::None;
        }

        let c = self.corner;
        if n.x < c && n.y < c {
            return DockZone::TopLeft;
        }
        if n.x > 1.0 - c && n.y < c {
            return DockZone::TopRight;
        }
        if n.x < c && n.y > 1.0 - c {
            return DockZone::BottomLeft;
        }
        if n.x > 1.0 - c && n.y > 1.0 - c {
            return DockZone::BottomRight;
        }

        let e = self.edge;
        if n.x < e {
            DockZone::Left
        } else if n.x > 1.0 - e {
            DockZone::Right
        } else if n.y < e {
            DockZone::Top
        } else if n.y > 1.0 - e {
            DockZone::Bottom
        } else {
            DockZone::Center
        }
    }
}

/// [`ZoneThresholds::detect`] with the default thresholds.
pub fn detect_zone(pointer: Pos2, dock_rect: Rect) -> DockZone {
    ZoneThresholds::default().detect(pointer, dock_rect)
}
