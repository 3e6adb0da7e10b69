use ahash::HashMap;
use egui::{Painter, Pos2};
use itertools::Itertools as _;

use crate::dock_space::{DockSpace, DockedWindow};
use crate::options::DockingOptions;
use crate::zone::DockZone;

/// A window that was taken out of every dock space and floats on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct DetachedWindow<W> {
    pub window: DockedWindow<W>,
    pub position: Pos2,
}

/// `source` was docked next to the window `target`, at `zone` of `target`'s dock space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DockRelationship {
    pub source: String,
    pub target: String,
    pub zone: DockZone,
}

/// Where a dragged window would land.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DockTarget {
    pub dock_space: String,
    pub zone: DockZone,
}

#[derive(Clone, Debug)]
struct WindowDrag {
    window: String,
    pointer: Option<Pos2>,
    target: Option<DockTarget>,
}

/// Owns every dock space of one UI instance and moves windows between them.
///
/// Construct one per editor window (or per test) and pass it to whoever needs it.
#[derive(Debug)]
pub struct DockingContext<W> {
    dock_spaces: HashMap<String, DockSpace<W>>,
    root: Option<String>,
    detached: HashMap<String, DetachedWindow<W>>,
    relationships: Vec<DockRelationship>,
    drag: Option<WindowDrag>,
    pub options: DockingOptions,
}

impl<W> Default for DockingContext<W> {
    fn default() -> Self {
        Self::new(DockingOptions::default())
    }
}

impl<W> DockingContext<W> {
    pub fn new(options: DockingOptions) -> Self {
        Self {
            dock_spaces: HashMap::default(),
            root: None,
            detached: HashMap::default(),
            relationships: Vec::new(),
            drag: None,
            options,
        }
    }

    /// Create a dock space called `name`, or return the existing one.
    ///
    /// The first dock space created becomes the root unless a root is already set.
    pub fn create_dock_space(&mut self, name: &str) -> &mut DockSpace<W> {
        if self.dock_spaces.contains_key(name) {
            log::warn!("dock space {name:?} already exists");
        } else if self.root.is_none() {
            self.root = Some(name.to_owned());
        }
        self.dock_spaces
            .entry(name.to_owned())
            .or_insert_with(|| DockSpace::with_options(name, &self.options))
    }

    pub fn dock_space(&self, name: &str) -> Option<&DockSpace<W>> {
        self.dock_spaces.get(name)
    }

    pub fn dock_space_mut(&mut self, name: &str) -> Option<&mut DockSpace<W>> {
        self.dock_spaces.get_mut(name)
    }

    /// Forget a dock space and the windows docked in it. Removing the root leaves the context
    /// without one.
    pub fn remove_dock_space(&mut self, name: &str) -> Option<DockSpace<W>> {
        let removed = self.dock_spaces.remove(name)?;
        if self.root.as_deref() == Some(name) {
            self.root = None;
        }
        for window in removed.docked_windows().keys() {
            self.remove_relationships(window);
        }
        Some(removed)
    }

    pub fn root_dock_space(&self) -> Option<&DockSpace<W>> {
        self.dock_spaces.get(self.root.as_deref()?)
    }

    pub fn root_dock_space_mut(&mut self) -> Option<&mut DockSpace<W>> {
        self.dock_spaces.get_mut(self.root.as_deref()?)
    }

    /// Make `dock_space` the root, adding it when no dock space of that name exists yet.
    ///
    /// An existing dock space with the same name is kept and `dock_space` is dropped.
    pub fn set_root_dock_space(&mut self, dock_space: DockSpace<W>) {
        let name = dock_space.name().to_owned();
        self.dock_spaces.entry(name.clone()).or_insert(dock_space);
        self.root = Some(name);
    }

    /// All dock spaces, sorted by name.
    pub fn dock_spaces(&self) -> impl Iterator<Item = &DockSpace<W>> + '_ {
        self.dock_spaces
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, space)| space)
    }

    pub fn len(&self) -> usize {
        self.dock_spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dock_spaces.is_empty()
    }

    /// Name of the dock space `window` is docked in.
    pub fn window_dock_space(&self, window: &str) -> Option<&str> {
        self.dock_spaces()
            .find(|space| space.window(window).is_some())
            .map(DockSpace::name)
    }

    pub fn detached_window(&self, name: &str) -> Option<&DetachedWindow<W>> {
        self.detached.get(name)
    }

    /// Detached windows, sorted by name.
    pub fn detached_windows(&self) -> impl Iterator<Item = &DetachedWindow<W>> + '_ {
        self.detached
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(_, window)| window)
    }

    pub fn relationships(&self) -> &[DockRelationship] {
        &self.relationships
    }

    fn remove_relationships(&mut self, window: &str) {
        self.relationships
            .retain(|rel| rel.source != window && rel.target != window);
    }

    /// Take `name` out of whichever dock space holds it, or out of the detached windows.
    fn take_window(&mut self, name: &str) -> Option<DockedWindow<W>> {
        if let Some(detached) = self.detached.remove(name) {
            return Some(detached.window);
        }
        let space = self.window_dock_space(name)?.to_owned();
        self.dock_spaces.get_mut(&space)?.undock_window(name)
    }

    /// Move a docked or detached window into `dock_space` at `zone`.
    ///
    /// Unknown windows or dock spaces and [`DockZone::None`] are refused. The window's earlier
    /// relationships are forgotten.
    pub fn dock_window_to_space(&mut self, window: &str, dock_space: &str, zone: DockZone) -> bool {
        if zone == DockZone::None || !self.dock_spaces.contains_key(dock_space) {
            return false;
        }
        let Some(taken) = self.take_window(window) else {
            log::warn!("cannot dock unknown window {window:?}");
            return false;
        };
        self.remove_relationships(window);

        let Some(space) = self.dock_spaces.get_mut(dock_space) else {
            let detached = DetachedWindow {
                window: taken,
                position: Pos2::ZERO,
            };
            self.detached.insert(window.to_owned(), detached);
            return false;
        };
        let DockedWindow {
            widget,
            name,
            title,
            ..
        } = taken;
        space.dock_window(widget, name, title, zone)
    }

    /// Dock `source` at `zone` of the dock space that holds `target`, and remember the pair.
    ///
    /// A window can't be docked to itself, and `target` must be docked somewhere.
    pub fn dock_window_to_window(&mut self, source: &str, target: &str, zone: DockZone) -> bool {
        if source == target {
            log::warn!("cannot dock window {source:?} to itself");
            return false;
        }
        let Some(space) = self.window_dock_space(target).map(str::to_owned) else {
            return false;
        };
        if !self.dock_window_to_space(source, &space, zone) {
            return false;
        }
        self.relationships.push(DockRelationship {
            source: source.to_owned(),
            target: target.to_owned(),
            zone,
        });
        true
    }

    /// Take `name` out of its dock space and let it float at `position`.
    ///
    /// An already detached window just moves. Returns `false` for unknown windows.
    pub fn detach_window(&mut self, name: &str, position: Pos2) -> bool {
        if let Some(detached) = self.detached.get_mut(name) {
            detached.position = position;
            return true;
        }
        let Some(window) = self.take_window(name) else {
            return false;
        };
        self.remove_relationships(name);
        self.detached
            .insert(name.to_owned(), DetachedWindow { window, position });
        true
    }

    /// The dock space under `pointer` and the zone hovered in it.
    ///
    /// Dock spaces nested inside others win: the smallest one containing the pointer is used,
    /// ties going to the first name.
    pub fn find_dock_target(&self, pointer: Pos2) -> Option<DockTarget> {
        let space = self
            .dock_spaces()
            .filter(|space| space.rect().is_positive() && space.rect().contains(pointer))
            .min_by(|a, b| a.rect().area().total_cmp(&b.rect().area()))?;
        let zone = space.zone_thresholds.detect(pointer, space.rect());
        (zone != DockZone::None).then(|| DockTarget {
            dock_space: space.name().to_owned(),
            zone,
        })
    }

    /// Start dragging a docked or detached window across dock spaces.
    pub fn begin_window_drag(&mut self, name: &str) -> bool {
        let known = self.detached.contains_key(name) || self.window_dock_space(name).is_some();
        if !known {
            log::warn!("cannot drag unknown window {name:?}");
            return false;
        }
        self.cancel_window_drag();
        self.drag = Some(WindowDrag {
            window: name.to_owned(),
            pointer: None,
            target: None,
        });
        true
    }

    pub fn dragging_window(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.window.as_str())
    }

    pub fn drag_target(&self) -> Option<&DockTarget> {
        self.drag.as_ref()?.target.as_ref()
    }

    /// Track the pointer: the hovered dock space shows its preview, every other one hides it.
    /// Does nothing without a window drag.
    pub fn update_window_drag_preview(&mut self, pointer: Pos2) {
        if self.drag.is_none() {
            return;
        }
        let target = self.find_dock_target(pointer);
        for (name, space) in &mut self.dock_spaces {
            if target.as_ref().is_some_and(|t| &t.dock_space == name) {
                space.hover_preview(pointer);
            } else {
                space.clear_hover_preview();
            }
        }
        if let Some(drag) = &mut self.drag {
            drag.pointer = Some(pointer);
            drag.target = target;
        }
    }

    /// Drop the dragged window: into the hovered dock space, or detached at the last pointer
    /// position when nothing was hovered. Returns `false` if there was no drag or nothing moved.
    pub fn end_window_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.clear_hover_previews();
        match (drag.target, drag.pointer) {
            (Some(target), _) => {
                self.dock_window_to_space(&drag.window, &target.dock_space, target.zone)
            }
            (None, Some(pointer)) => self.detach_window(&drag.window, pointer),
            (None, None) => false,
        }
    }

    pub fn cancel_window_drag(&mut self) {
        if self.drag.take().is_some() {
            self.clear_hover_previews();
        }
    }

    fn clear_hover_previews(&mut self) {
        for space in self.dock_spaces.values_mut() {
            space.clear_hover_preview();
        }
    }

    /// Paint the drop previews of every dock space.
    pub fn paint(&self, painter: &Painter) {
        for space in self.dock_spaces() {
            space.paint(painter);
        }
    }
}
