use egui::{Color32, Painter, Pos2, Rect, Rgba, Stroke, StrokeKind, Vec2};

use crate::zone::{DockZone, ZoneThresholds};

/// The rectangle to highlight when a window is dropped into `zone` of `dock_rect`.
///
/// Halves for the edges, quadrants for the corners and a box inset by 10% for the center.
/// [`DockZone::None`] has no preview.
pub fn preview_rect(zone: DockZone, dock_rect: Rect) -> Option<Rect> {
    let min = dock_rect.min;
    let size = dock_rect.size();
    let half = size * 0.5;

    let (pos, size) = match zone {
        DockZone::None => return None,
        DockZone::Left => (min, Vec2::new(half.x, size.y)),
        DockZone::Right => (min + Vec2::new(half.x, 0.0), Vec2::new(half.x, size.y)),
        DockZone::Top => (min, Vec2::new(size.x, half.y)),
        DockZone::Bottom => (min + Vec2::new(0.0, half.y), Vec2::new(size.x, half.y)),
        DockZone::Center => (min + size * 0.1, size * 0.8),
        DockZone::TopLeft => (min, half),
        DockZone::TopRight => (min + Vec2::new(half.x, 0.0), half),
        DockZone::BottomLeft => (min + Vec2::new(0.0, half.y), half),
        DockZone::BottomRight => (min + half, half),
    };

    Some(Rect::from_min_size(pos, size))
}

/// Highlight shown over a dock space while a window is being dragged.
#[derive(Clone, Copy, Debug)]
pub struct DockPreview {
    active: bool,
    zone: DockZone,
    rect: Option<Rect>,

    /// Fill opacity, the outline is drawn `0.2` more opaque.
    pub opacity: f32,
}

impl Default for DockPreview {
    fn default() -> Self {
        Self {
            active: false,
            zone: DockZone::None,
            rect: None,
            opacity: 0.3,
        }
    }
}

impl DockPreview {
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.zone = DockZone::None;
            self.rect = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn zone(&self) -> DockZone {
        self.zone
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Recompute zone and highlight for the current pointer. Does nothing while inactive.
    pub fn update(&mut self, pointer: Pos2, dock_rect: Rect, thresholds: ZoneThresholds) {
        if !self.active {
            return;
        }
        self.zone = thresholds.detect(pointer, dock_rect);
        self.rect = preview_rect(self.zone, dock_rect);
    }

    pub fn fill_color(&self) -> Color32 {
        Rgba::from_rgba_unmultiplied(0.2, 0.4, 0.8, self.opacity.clamp(0.0, 1.0)).into()
    }

    pub fn stroke_color(&self) -> Color32 {
        Rgba::from_rgba_unmultiplied(0.3, 0.5, 0.9, (self.opacity + 0.2).clamp(0.0, 1.0)).into()
    }

    pub fn paint(&self, painter: &Painter) {
        if !self.active {
            return;
        }
        let Some(rect) = self.rect else {
            return;
        };

        painter.rect_filled(rect, 0.0, self.fill_color());
        painter.rect_stroke(
            rect,
            0.0,
            Stroke::new(2.0, self.stroke_color()),
            StrokeKind::Inside,
        );
    }
}
