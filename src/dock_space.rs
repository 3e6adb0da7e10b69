//! A dock space hosting named windows in tab stacks, with drag-to-dock.

use ahash::HashMap;
use egui::{Painter, Pos2, Rect, Vec2};

use crate::options::DockingOptions;
use crate::preview::DockPreview;
use crate::tabs::TabStack;
use crate::tree::sanitize_ratio;
use crate::zone::{DockZone, ZoneThresholds};


/// A window hosted by a [`DockSpace`]. `W` is whatever handle the application uses for its widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct DockedWindow<W> {
    pub widget: W,
    pub name: String,
    pub title: String,
    pub visible: bool,
    pub active: bool,
}

impl<W> DockedWindow<W> {
    pub fn new(widget: W, name: impl Into<String>, title: impl Into<String>) -> Self {
        let name = name.into();
        let title = title.into();
        Self {
            widget,
            title: if title.is_empty() { name.clone() } else { title },
            name,
            visible: true,
            active: false,
        }
    }
}

/// A two-way split of the dock space.
///
/// `vertical` splits put `first` on the left and `second` on the right; horizontal splits stack
/// `first` above `second`. `ratio` is the share given to `first`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DockSplit {
    pub vertical: bool,
    pub ratio: f32,
    pub first: TabStack,
    pub second: TabStack,
}

impl DockSplit {
    pub fn new(vertical: bool, ratio: f32) -> Self {
        Self {
            vertical,
            ratio: sanitize_ratio(ratio),
            first: TabStack::default(),
            second: TabStack::default(),
        }
    }

    /// The areas of `first` and `second` inside `rect`.
    pub fn rects(&self, rect: Rect) -> (Rect, Rect) {
        let ratio = sanitize_ratio(self.ratio);
        if self.vertical {
            let size = Vec2::new(rect.width() * ratio, rect.height());
            let first = Rect::from_min_size(rect.min, size);
            let second = Rect::from_min_max(Pos2::new(first.max.x, rect.min.y), rect.max);
            (first, second)
        } else {
            let size = Vec2::new(rect.width(), rect.height() * ratio);
            let first = Rect::from_min_size(rect.min, size);
            let second = Rect::from_min_max(Pos2::new(rect.min.x, first.max.y), rect.max);
            (first, second)
        }
    }

    fn stacks_mut(&mut self) -> [&mut TabStack; 2] {
        [&mut self.first, &mut self.second]
    }
}

/// A rectangular region windows can be docked into.
#[derive(Debug)]
pub struct DockSpace<W> {
    name: String,
    rect: Rect,
    root_tabs: TabStack,
    splits: Vec<DockSplit>,
    windows: HashMap<String, DockedWindow<W>>,
    dragging: Option<String>,
    preview: DockPreview,

    pub zone_thresholds: ZoneThresholds,

    /// Ratio used by [`Self::split_default`].
    pub default_split_ratio: f32,
}

impl<W> DockSpace<W> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, &DockingOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: &DockingOptions) -> Self {
        Self {
            name: name.into(),
            rect: Rect::NOTHING,
            root_tabs: TabStack::default(),
            splits: Vec::new(),
            windows: HashMap::default(),
            dragging: None,
            preview: DockPreview::with_opacity(options.preview_opacity),
            zone_thresholds: options.zone_thresholds,
            default_split_ratio: options.default_split_ratio,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn root_tabs(&self) -> &TabStack {
        &self.root_tabs
    }

    pub(crate) fn set_root_tabs(&mut self, tabs: TabStack) {
        self.root_tabs = tabs;
    }

    pub fn splits(&self) -> &[DockSplit] {
        &self.splits
    }

    pub fn add_split(&mut self, split: DockSplit) {
        self.splits.push(split);
    }

    pub fn docked_windows(&self) -> &HashMap<String, DockedWindow<W>> {
        &self.windows
    }

    pub fn window(&self, name: &str) -> Option<&DockedWindow<W>> {
        self.windows.get(name)
    }

    pub fn window_mut(&mut self, name: &str) -> Option<&mut DockedWindow<W>> {
        self.windows.get_mut(name)
    }

    pub fn preview(&self) -> &DockPreview {
        &self.preview
    }

    /// Name of the window being dragged, if any.
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    fn stacks_mut(&mut self) -> impl Iterator<Item = &mut TabStack> + '_ {
        std::iter::once(&mut self.root_tabs)
            .chain(self.splits.iter_mut().flat_map(DockSplit::stacks_mut))
    }

    /// Make every tabbed window's `active` flag agree with its stack's active tab.
    fn sync_active_flags(&mut self) {
        let stacks = std::iter::once(&self.root_tabs)
            .chain(self.splits.iter().flat_map(|s| [&s.first, &s.second]));
        for stack in stacks {
            for tab in stack.tabs() {
                if let Some(window) = self.windows.get_mut(&tab.id) {
                    window.active = stack.is_active(&tab.id);
                }
            }
        }
    }

    /// The tab stack that currently holds `name`.
    pub fn stack_of(&self, name: &str) -> Option<&TabStack> {
        std::iter::once(&self.root_tabs)
            .chain(self.splits.iter().flat_map(|s| [&s.first, &s.second]))
            .find(|stack| stack.contains(name))
    }

    /// Dock `widget` under `name` at `zone`.
    ///
    /// Without splits every window goes to the root tabs. With splits, the most recent split
    /// receives left-side zones in its first stack and right-side zones in its second stack;
    /// every other zone goes to the root tabs. An empty `title` falls back to `name`.
    ///
    /// Docking a name that is already docked moves it. The window is active exactly when it is
    /// the active tab of the stack it lands in.
    pub fn dock_window(
        &mut self,
        widget: W,
        name: impl Into<String>,
        title: impl Into<String>,
        zone: DockZone,
    ) -> bool {
        let mut window = DockedWindow::new(widget, name, title);

        if self.undock_window(&window.name).is_some() {
            log::debug!("dock space {:?}: re-docking {:?}", self.name, window.name);
        }

        let stack = match self.splits.last_mut() {
            Some(split) if zone.is_leading() => &mut split.first,
            Some(split) if zone.is_trailing() => &mut split.second,
            _ => &mut self.root_tabs,
        };
        if !stack.add_tab(window.name.clone(), window.title.clone(), true) {
            return false;
        }
        window.active = stack.is_active(&window.name);

        log::debug!(
            "dock space {:?}: docked {:?} at {zone:?}",
            self.name,
            window.name
        );
        self.windows.insert(window.name.clone(), window);
        true
    }

    /// Remove `name` from every tab stack and forget it.
    pub fn undock_window(&mut self, name: &str) -> Option<DockedWindow<W>> {
        let window = self.windows.remove(name)?;
        for stack in self.stacks_mut() {
            stack.remove_tab(name);
        }
        self.sync_active_flags();
        Some(window)
    }

    /// Add a split. The very first split takes over the existing root tabs in its first stack.
    pub fn split(&mut self, vertical: bool, ratio: f32) -> bool {
        let mut split = DockSplit::new(vertical, ratio);
        if self.splits.is_empty() {
            split.first.append(&mut self.root_tabs);
        }
        self.splits.push(split);
        true
    }

    /// [`Self::split`] at [`Self::default_split_ratio`].
    pub fn split_default(&mut self, vertical: bool) -> bool {
        self.split(vertical, self.default_split_ratio)
    }

    /// Pane areas of every split, in the order the splits were added.
    pub fn split_rects(&self) -> Vec<(Rect, Rect)> {
        self.splits.iter().map(|s| s.rects(self.rect)).collect()
    }

    /// Start dragging a docked window. Unknown names are refused.
    pub fn begin_drag(&mut self, name: &str) -> bool {
        if !self.windows.contains_key(name) {
            log::warn!("dock space {:?}: cannot drag unknown window {name:?}", self.name);
            return false;
        }
        self.dragging = Some(name.to_owned());
        self.preview.set_active(true);
        true
    }

    /// Track the pointer while dragging; does nothing otherwise.
    pub fn update_drag_preview(&mut self, pointer: Pos2) {
        if self.dragging.is_some() {
            self.preview.update(pointer, self.rect, self.zone_thresholds);
        }
    }

    /// Finish the drag, re-docking the dragged window at the hovered zone.
    ///
    /// Returns `false` if no drag was in progress. Releasing outside the dock space leaves the
    /// window where it was.
    pub fn end_drag(&mut self) -> bool {
        let Some(name) = self.dragging.take() else {
            return false;
        };

        let zone = self.preview.zone();
        self.preview.set_active(false);

        if zone != DockZone::None {
            match self.undock_window(&name) {
                Some(window) => {
                    let DockedWindow { widget, title, .. } = window;
                    self.dock_window(widget, name, title, zone);
                }
                None => log::warn!("dock space {:?}: dragged window {name:?} is gone", self.name),
            }
        }
        true
    }

    /// Drop any drag in progress without moving anything.
    pub fn cancel_drag(&mut self) {
        self.dragging = None;
        self.preview.set_active(false);
    }

    /// Show the drop preview for a window dragged in from elsewhere and return the hovered zone.
    pub fn hover_preview(&mut self, pointer: Pos2) -> DockZone {
        self.preview.set_active(true);
        self.preview.update(pointer, self.rect, self.zone_thresholds);
        self.preview.zone()
    }

    /// Hide a preview shown by [`Self::hover_preview`]. A drag of this dock space's own keeps
    /// its preview.
    pub fn clear_hover_preview(&mut self) {
        if self.dragging.is_none() {
            self.preview.set_active(false);
        }
    }

    /// Tab activated by the user.
    pub fn activate_tab(&mut self, name: &str) -> bool {
        let found = self.stacks_mut().any(|stack| stack.set_active(name));
        if found {
            self.sync_active_flags();
        }
        found
    }

    /// Tab closed by the user.
    pub fn close_tab(&mut self, name: &str) -> Option<DockedWindow<W>> {
        self.undock_window(name)
    }

    pub fn clear(&mut self) {
        self.splits.clear();
        self.windows.clear();
        self.root_tabs.clear();
        self.cancel_drag();
    }

    /// Register an already described window, e.g. one restored by the application.
    ///
    /// A window no stack holds yet only gets a tab while the dock space has no splits. An
    /// `active` window becomes the active tab of its stack; otherwise its flag follows the stack.
    pub fn add_docked_window(&mut self, window: DockedWindow<W>) {
        let name = window.name.clone();
        if self.splits.is_empty() && self.stack_of(&name).is_none() {
            self.root_tabs.add_tab(name.clone(), window.title.clone(), true);
        }
        let active = window.active;
        self.windows.insert(name.clone(), window);
        if !(active && self.activate_tab(&name)) {
            self.sync_active_flags();
        }
    }

    /// Remove tabs whose window isn't docked here.
    pub(crate) fn drop_orphan_tabs(&mut self) {
        let windows = &self.windows;
        let stacks = std::iter::once(&mut self.root_tabs)
            .chain(self.splits.iter_mut().flat_map(DockSplit::stacks_mut));
        for stack in stacks {
            let orphans: Vec<String> = stack
                .tabs()
                .iter()
                .filter(|tab| !windows.contains_key(&tab.id))
                .map(|tab| tab.id.clone())
                .collect();
            for id in orphans {
                log::warn!("dropping tab {id:?} without a docked window");
                stack.remove_tab(&id);
            }
        }
        self.sync_active_flags();
    }

    /// Paint the drop preview while it is shown.
    pub fn paint(&self, painter: &Painter) {
        self.preview.paint(painter);
    }
}
