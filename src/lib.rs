//! Dock-space layout engine for the VersaUI editor shell.
//!
//! - [`DockTree`]: arena-backed tree of directional/tabbed dock nodes.
//! - [`detect_zone`] / [`preview_rect`]: drag-to-dock zone detection and highlight geometry.
//! - [`DockSpace`] / [`DockingContext`]: windows hosted in tab stacks, with drag-to-dock inside
//!   and across dock spaces.
//! - [`EditorLayout`]: the editor's default layout, saved to and loaded from JSON. Dock spaces
//!   save and restore their own snapshots.

#![forbid(unsafe_code)]

pub mod context;
pub mod dock_space;
pub mod layout;
pub mod options;
pub mod preview;
pub mod tabs;
pub mod tree;
pub mod zone;

#[cfg(feature = "persistence")]
pub mod persistence;

pub use context::{DetachedWindow, DockRelationship, DockTarget, DockingContext};
pub use dock_space::{DockSpace, DockSplit, DockedWindow};
pub use layout::EditorLayout;
pub use options::DockingOptions;
pub use preview::{DockPreview, preview_rect};
pub use tabs::{Tab, TabStack};
pub use tree::{DockDirection, DockNode, DockNodeId, DockTree};
pub use zone::{DockZone, ZONE_CORNER_THRESHOLD, ZONE_EDGE_THRESHOLD, ZoneThresholds, detect_zone};

#[cfg(feature = "persistence")]
pub use persistence::{
    DOCK_SPACE_LAYOUT_VERSION, DockSpaceFile, DockSpaceSnapshot, DockSplitSnapshot,
    DockedWindowSnapshot, LayoutNode, LayoutPersistenceError, MAX_LAYOUT_DEPTH,
};
