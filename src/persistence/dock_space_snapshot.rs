//! Whole dock-space layouts: splits, tab stacks and the state of the docked windows.
//!
//! ```json
//! {
//!     "version": 1,
//!     "dockSpace": {
//!         "name": "main",
//!         "splits": [
//!             { "isVertical": true, "ratio": 0.7, "leftTabs": {..}, "rightTabs": {..} }
//!         ],
//!         "windows": [
//!             { "name": "console", "title": "Console", "isVisible": true, "isActive": true }
//!         ],
//!         "rootTabs": {
//!             "tabs": [{ "id": "console", "label": "Console", "canClose": true }],
//!             "active": 0
//!         }
//!     }
//! }
//! ```
//!
//! Widgets are not saved. Restoring asks the application for one widget per saved window name.

use std::path::Path;

use itertools::Itertools as _;

use super::{LayoutPersistenceError, read_optional, to_pretty_json};
use crate::dock_space::{DockSpace, DockSplit, DockedWindow};
use crate::tabs::TabStack;

/// Version written to dock-space files. Files with a newer version are refused.
pub const DOCK_SPACE_LAYOUT_VERSION: u32 = 1;

fn default_true() -> bool {
    true
}

fn default_ratio() -> f32 {
    0.5
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockedWindowSnapshot {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockSplitSnapshot {
    #[serde(default = "default_true")]
    pub is_vertical: bool,
    #[serde(default = "default_ratio")]
    pub ratio: f32,
    #[serde(default)]
    pub left_tabs: TabStack,
    #[serde(default)]
    pub right_tabs: TabStack,
}

/// Everything a [`DockSpace`] needs to come back the way it was, minus the widgets.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockSpaceSnapshot {
    pub name: String,
    #[serde(default)]
    pub splits: Vec<DockSplitSnapshot>,
    /// Sorted by name.
    #[serde(default)]
    pub windows: Vec<DockedWindowSnapshot>,
    #[serde(default)]
    pub root_tabs: TabStack,
}

/// The on-disk envelope of a [`DockSpaceSnapshot`].
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockSpaceFile {
    pub version: u32,
    pub dock_space: DockSpaceSnapshot,
}

impl DockSpaceSnapshot {
    /// # Errors
    /// Only if serialization itself fails.
    pub fn to_json_string(&self) -> Result<String, LayoutPersistenceError> {
        to_pretty_json(&DockSpaceFile {
            version: DOCK_SPACE_LAYOUT_VERSION,
            dock_space: self.clone(),
        })
    }

    /// # Errors
    /// Malformed JSON, a missing `version`, or a version newer than
    /// [`DOCK_SPACE_LAYOUT_VERSION`].
    pub fn from_json_str(json: &str) -> Result<Self, LayoutPersistenceError> {
        let file: DockSpaceFile = serde_json::from_str(json)?;
        if file.version > DOCK_SPACE_LAYOUT_VERSION {
            return Err(LayoutPersistenceError::UnsupportedVersion {
                found: file.version,
            });
        }
        Ok(file.dock_space)
    }
}

/// A copy of `saved` that keeps the stack invariants: unique ids, a valid active tab.
fn restored_stack(saved: &TabStack) -> TabStack {
    let mut stack = TabStack::default();
    for tab in saved.tabs() {
        stack.add_tab(tab.id.clone(), tab.label.clone(), tab.can_close);
    }
    if let Some(active) = saved.active_tab() {
        stack.set_active(&active.id);
    }
    stack
}

impl<W> DockSpace<W> {
    pub fn to_snapshot(&self) -> DockSpaceSnapshot {
        DockSpaceSnapshot {
            name: self.name().to_owned(),
            splits: self
                .splits()
                .iter()
                .map(|split| DockSplitSnapshot {
                    is_vertical: split.vertical,
                    ratio: split.ratio,
                    left_tabs: split.first.clone(),
                    right_tabs: split.second.clone(),
                })
                .collect(),
            windows: self
                .docked_windows()
                .values()
                .sorted_by(|a, b| a.name.cmp(&b.name))
                .map(|window| DockedWindowSnapshot {
                    name: window.name.clone(),
                    title: window.title.clone(),
                    is_visible: window.visible,
                    is_active: window.active,
                })
                .collect(),
            root_tabs: self.root_tabs().clone(),
        }
    }

    /// Replace everything in this dock space with `snapshot`.
    ///
    /// `widget_for` is asked for the widget of every saved window. Windows it has none for are
    /// skipped, and so are their tabs. The dock space keeps its own name.
    pub fn restore_snapshot(
        &mut self,
        snapshot: &DockSpaceSnapshot,
        mut widget_for: impl FnMut(&str) -> Option<W>,
    ) {
        if snapshot.name != self.name() {
            log::debug!("restoring layout {:?} into dock space {:?}", snapshot.name, self.name());
        }

        self.clear();
        self.set_root_tabs(restored_stack(&snapshot.root_tabs));
        for saved in &snapshot.splits {
            let mut split = DockSplit::new(saved.is_vertical, saved.ratio);
            split.first = restored_stack(&saved.left_tabs);
            split.second = restored_stack(&saved.right_tabs);
            self.add_split(split);
        }

        for saved in &snapshot.windows {
            let Some(widget) = widget_for(&saved.name) else {
                log::warn!(
                    "dock space {:?}: no widget for saved window {:?}",
                    self.name(),
                    saved.name
                );
                continue;
            };
            let mut window = DockedWindow::new(widget, saved.name.clone(), saved.title.clone());
            window.visible = saved.is_visible;
            window.active = saved.is_active;
            self.add_docked_window(window);
        }

        self.drop_orphan_tabs();
    }

    /// Save splits, tabs and window state as a versioned JSON file.
    ///
    /// # Errors
    /// Serialization or io failures.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LayoutPersistenceError> {
        std::fs::write(path, self.to_snapshot().to_json_string()?)?;
        Ok(())
    }

    /// Restore a file written by [`Self::save_to_file`], see [`Self::restore_snapshot`].
    ///
    /// Returns `Ok(false)`, leaving the dock space unchanged, when there is no file.
    ///
    /// # Errors
    /// Unreadable, malformed or too new files; the dock space is left unchanged.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        widget_for: impl FnMut(&str) -> Option<W>,
    ) -> Result<bool, LayoutPersistenceError> {
        let Some(json) = read_optional(path.as_ref())? else {
            return Ok(false);
        };
        let snapshot = DockSpaceSnapshot::from_json_str(&json)?;
        self.restore_snapshot(&snapshot, widget_for);
        Ok(true)
    }
}
