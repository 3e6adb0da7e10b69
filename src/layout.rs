use egui::Vec2;

use crate::options::DockingOptions;
use crate::tree::{DockDirection, DockNodeId, DockTree};

/// The editor's dock layout: a [`DockTree`] plus the default arrangement it falls back to.
#[derive(Clone, Debug)]
pub struct EditorLayout {
    tree: DockTree,
    default_size: Vec2,
}

impl Default for EditorLayout {
    fn default() -> Self {
        Self::with_options(&DockingOptions::default())
    }
}

impl EditorLayout {
    /// A layout initialised with [`Self::reset`], the root sized `default_size`.
    pub fn new(default_size: Vec2) -> Self {
        Self {
            tree: default_tree(default_size),
            default_size,
        }
    }

    /// The default arrangement sized [`DockingOptions::default_layout_size`].
    pub fn with_options(options: &DockingOptions) -> Self {
        Self::new(options.default_layout_size)
    }

    /// Wrap an existing tree. [`Self::reset`] later rebuilds the default arrangement at the size
    /// of this tree's root.
    pub fn from_tree(tree: DockTree) -> Self {
        let default_size = tree
            .node(tree.root())
            .map_or(DockingOptions::default().default_layout_size, |n| n.size);
        Self { tree, default_size }
    }

    pub fn tree(&self) -> &DockTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DockTree {
        &mut self.tree
    }

    pub fn root(&self) -> DockNodeId {
        self.tree.root()
    }

    /// Throw the current layout away and rebuild the default one:
    ///
    /// ```text
    /// Root
    /// ├── Viewport          (horizontal, 0.75)
    /// │   └── Properties    (horizontal, 0.8)
    /// └── Scene Hierarchy   (vertical, 0.7)
    ///     └── Console       (tab)
    ///         └── Asset Browser
    /// ```
    pub fn reset(&mut self) {
        self.tree = default_tree(self.default_size);
    }

    pub fn split(
        &mut self,
        node: DockNodeId,
        direction: DockDirection,
        ratio: f32,
    ) -> Option<DockNodeId> {
        self.tree.split(node, direction, ratio)
    }

    pub fn remove_node(&mut self, node: DockNodeId) -> bool {
        self.tree.remove_node(node)
    }

    pub fn find_node(&self, name: &str) -> Option<DockNodeId> {
        self.tree.find_node(name)
    }

    pub fn all_nodes(&self) -> Vec<DockNodeId> {
        self.tree.all_nodes()
    }
}

fn named_split(
    tree: &mut DockTree,
    node: DockNodeId,
    direction: DockDirection,
    ratio: f32,
    name: &str,
) -> Option<DockNodeId> {
    let id = tree.split(node, direction, ratio)?;
    tree.node_mut(id)?.name = name.to_owned();
    Some(id)
}

fn default_tree(size: Vec2) -> DockTree {
    let mut tree = DockTree::new("Root", size);
    if build_default_layout(&mut tree).is_none() {
        log::warn!("default layout is incomplete:\n{}", tree.debug_summary(32));
    }
    tree
}

fn build_default_layout(tree: &mut DockTree) -> Option<()> {
    let root = tree.root();

    let viewport = named_split(tree, root, DockDirection::Horizontal, 0.75, "Viewport")?;
    named_split(tree, viewport, DockDirection::Horizontal, 0.8, "Properties")?;

    let hierarchy = named_split(tree, root, DockDirection::Vertical, 0.7, "Scene Hierarchy")?;
    let console = named_split(tree, hierarchy, DockDirection::Tab, 0.5, "Console")?;

    let assets = tree.create_node("Asset Browser", Vec2::ZERO);
    tree.add_child(console, assets).then_some(())
}

#[cfg(feature = "persistence")]
impl EditorLayout {
    /// # Errors
    /// Serialization or io failures.
    pub fn save_to_file(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), crate::LayoutPersistenceError> {
        self.tree.save_to_file(path)
    }

    /// Replace the layout with the one stored at `path`.
    ///
    /// Returns `Ok(false)`, leaving the layout unchanged, when there is no file.
    ///
    /// # Errors
    /// Unreadable or malformed files; the layout is left unchanged.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<bool, crate::LayoutPersistenceError> {
        match DockTree::load_from_file(path)? {
            Some(tree) => {
                self.tree = tree;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The layout saved at `path`, or the default one if there is none or it can't be read.
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        let mut layout = Self::default();
        if let Err(err) = layout.load_from_file(path) {
            log::warn!("ignoring layout {}: {err}", path.display());
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(layout: &EditorLayout, id: DockNodeId) -> &str {
        &layout.tree().node(id).unwrap().name
    }

    #[test]
    fn default_layout_shape() {
        let layout = EditorLayout::default();
        let tree = layout.tree();
        assert!(tree.integrity_issues().is_empty(), "{:?}", tree.integrity_issues());
        assert_eq!(tree.len(), 6);

        let names: Vec<&str> = layout.all_nodes().into_iter().map(|id| name(&layout, id)).collect();
        assert_eq!(
            names,
            ["Root", "Viewport", "Scene Hierarchy", "Properties", "Console", "Asset Browser"]
        );

        let properties = layout.find_node("Properties").unwrap();
        let parent = tree.parent(properties).unwrap();
        assert_eq!(name(&layout, parent), "Viewport");

        let root = tree.node(layout.root()).unwrap();
        assert_eq!(root.size, Vec2::new(1280.0, 720.0));

        let console = layout.find_node("Console").unwrap();
        assert_eq!(tree.node(console).unwrap().split_direction, DockDirection::Tab);
        let assets = layout.find_node("Asset Browser").unwrap();
        assert_eq!(tree.parent(assets), Some(console));
    }

    #[test]
    fn reset_discards_edits() {
        let mut layout = EditorLayout::default();
        let viewport = layout.find_node("Viewport").unwrap();
        assert!(layout.remove_node(viewport));
        assert!(layout.find_node("Properties").is_none());
        assert!(!layout.remove_node(layout.root()));

        layout.reset();
        assert!(layout.find_node("Properties").is_some());
        assert_eq!(layout.all_nodes().len(), 6);
    }

    #[test]
    fn options_size_the_root() {
        let options = DockingOptions {
            default_layout_size: Vec2::new(800.0, 600.0),
            ..Default::default()
        };
        let mut layout = EditorLayout::with_options(&options);
        let root_size = |layout: &EditorLayout| layout.tree().node(layout.root()).unwrap().size;
        assert_eq!(root_size(&layout), Vec2::new(800.0, 600.0));

        let root = layout.root();
        layout.tree_mut().node_mut(root).unwrap().size = Vec2::new(1.0, 1.0);
        layout.reset();
        assert_eq!(root_size(&layout), Vec2::new(800.0, 600.0), "reset uses the configured size");
    }

    #[test]
    fn from_tree_keeps_tree_and_resets_at_its_size() {
        let mut tree = DockTree::new("Main", Vec2::new(640.0, 480.0));
        let side = tree.split(tree.root(), DockDirection::Vertical, 0.3).unwrap();
        tree.node_mut(side).unwrap().name = "Side".to_owned();

        let mut layout = EditorLayout::from_tree(tree);
        assert!(layout.find_node("Side").is_some());
        assert!(layout.find_node("Viewport").is_none());

        layout.reset();
        assert!(layout.find_node("Side").is_none());
        assert!(layout.find_node("Viewport").is_some());
        let root = layout.tree().node(layout.root()).unwrap();
        assert_eq!((root.name.as_str(), root.size), ("Root", Vec2::new(640.0, 480.0)));
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor_layout.json");

        let mut layout = EditorLayout::default();
        let extra = layout.split(layout.root(), DockDirection::Vertical, 0.2).unwrap();
        layout.tree_mut().node_mut(extra).unwrap().name = "Timeline".to_owned();
        layout.save_to_file(&path).unwrap();

        let mut loaded = EditorLayout::default();
        assert!(loaded.load_from_file(&path).unwrap());
        let timeline = loaded.find_node("Timeline").unwrap();
        assert_eq!(loaded.tree().parent(timeline), Some(loaded.root()));
        assert_eq!(loaded.all_nodes().len(), 7);
    }

    #[cfg(feature = "persistence")]
    #[test]
    fn missing_file_keeps_layout_and_bad_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        let mut layout = EditorLayout::default();
        let viewport = layout.find_node("Viewport").unwrap();
        layout.remove_node(viewport);
        assert!(!layout.load_from_file(&path).unwrap());
        assert!(layout.find_node("Viewport").is_none(), "unchanged");

        std::fs::write(&path, "{\"name\": 3}").unwrap();
        assert!(layout.load_from_file(&path).is_err());
        assert!(layout.find_node("Viewport").is_none(), "unchanged");

        let fallback = EditorLayout::load_or_default(&path);
        assert!(fallback.find_node("Viewport").is_some());
    }
}
