use egui::Vec2;

use crate::zone::ZoneThresholds;

/// Options shared by every dock space of a [`crate::DockingContext`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DockingOptions {
    /// Normalized edge/corner thresholds for drop-zone detection.
    pub zone_thresholds: ZoneThresholds,

    /// Fill opacity of the drop preview. The outline is drawn `0.2` more opaque.
    pub preview_opacity: f32,

    /// Size given to the root node by [`crate::EditorLayout::with_options`].
    pub default_layout_size: Vec2,

    /// Ratio used by [`crate::DockSpace::split_default`].
    pub default_split_ratio: f32,
}

impl Default for DockingOptions {
    fn default() -> Self {
        Self {
            zone_thresholds: ZoneThresholds::default(),
            preview_opacity: 0.3,
            default_layout_size: Vec2::new(1280.0, 720.0),
            default_split_ratio: 0.5,
        }
    }
}
