//! Dock tree (de)serialization.
//!
//! The JSON layout file nests nodes recursively:
//!
//! ```json
//! {
//!     "name": "Root",
//!     "size": [1280.0, 720.0],
//!     "position": [0.0, 0.0],
//!     "splitRatio": 0.5,
//!     "splitDirection": 0,
//!     "visible": true,
//!     "children": []
//! }
//! ```
//!
//! There is no version field. Parent links are not stored; they are rebuilt after loading.
//!
//! Nesting is bounded by [`MAX_LAYOUT_DEPTH`]: deeper trees are refused when saving and when
//! loading, so anything this module writes it can also read back.
//!
//! Whole dock spaces (splits, tab stacks and docked windows) are saved separately, see
//! [`DockSpaceSnapshot`].

use std::path::Path;

use ahash::HashMap;
use egui::{Pos2, Vec2};

use crate::tree::{DockDirection, DockNode, DockNodeId, DockTree};

mod dock_space_snapshot;

pub use dock_space_snapshot::{
    DOCK_SPACE_LAYOUT_VERSION, DockSpaceFile, DockSpaceSnapshot, DockSplitSnapshot,
    DockedWindowSnapshot,
};

/// Deepest dock tree (counting the root as one level) that can be saved and loaded.
pub const MAX_LAYOUT_DEPTH: usize = 48;

/// RON counts several nesting levels per layout node.
const RON_RECURSION_LIMIT: usize = 8 * MAX_LAYOUT_DEPTH;

#[derive(Debug)]
pub enum LayoutPersistenceError {
    Json(serde_json::Error),
    RonSerialize(ron::Error),
    RonDeserialize(ron::error::SpannedError),
    Io(std::io::Error),

    /// The tree nests deeper than [`MAX_LAYOUT_DEPTH`].
    TooDeep { depth: usize },

    /// A dock-space file written by a newer version of the format.
    UnsupportedVersion { found: u32 },
}

impl std::fmt::Display for LayoutPersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "json layout error: {err}"),
            Self::RonSerialize(err) => write!(f, "ron serialize error: {err}"),
            Self::RonDeserialize(err) => write!(f, "ron deserialize error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::TooDeep { depth } => write!(
                f,
                "layout is {depth} levels deep, at most {MAX_LAYOUT_DEPTH} are supported"
            ),
            Self::UnsupportedVersion { found } => write!(
                f,
                "layout version {found} is newer than supported version {DOCK_SPACE_LAYOUT_VERSION}"
            ),
        }
    }
}

impl std::error::Error for LayoutPersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::RonSerialize(err) => Some(err),
            Self::RonDeserialize(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::TooDeep { .. } | Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for LayoutPersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LayoutPersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ron::Error> for LayoutPersistenceError {
    fn from(err: ron::Error) -> Self {
        Self::RonSerialize(err)
    }
}

impl From<ron::error::SpannedError> for LayoutPersistenceError {
    fn from(err: ron::error::SpannedError) -> Self {
        Self::RonDeserialize(err)
    }
}

/// One node of a layout file, children nested inline.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub name: String,
    pub size: [f32; 2],
    pub position: [f32; 2],
    pub split_ratio: f32,
    pub split_direction: DockDirection,
    pub visible: bool,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    fn from_dock_node(node: &DockNode) -> Self {
        Self {
            name: node.name.clone(),
            size: [node.size.x, node.size.y],
            position: [node.position.x, node.position.y],
            split_ratio: node.split_ratio(),
            split_direction: node.split_direction,
            visible: node.visible,
            children: Vec::new(),
        }
    }

    fn to_dock_node(&self) -> DockNode {
        let size = Vec2::new(self.size[0], self.size[1]);
        let mut node = DockNode::new(self.name.clone(), size);
        node.position = Pos2::new(self.position[0], self.position[1]);
        node.split_direction = self.split_direction;
        node.set_split_ratio(self.split_ratio);
        node.visible = self.visible;
        node
    }

    /// Number of nested levels, this node included.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max_depth
    }
}

fn check_depth(depth: usize) -> Result<(), LayoutPersistenceError> {
    if depth > MAX_LAYOUT_DEPTH {
        Err(LayoutPersistenceError::TooDeep { depth })
    } else {
        Ok(())
    }
}

impl DockTree {
    /// Snapshot the tree reachable from the root as nested [`LayoutNode`]s.
    pub fn to_layout_node(&self) -> LayoutNode {
        // Breadth-first order lists parents before children, so walking it backwards builds
        // every child before the parent that adopts it.
        let order = self.all_nodes();
        let mut built: HashMap<DockNodeId, LayoutNode> = HashMap::default();
        for &id in order.iter().rev() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let mut out = LayoutNode::from_dock_node(node);
            out.children = node
                .children()
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(id, out);
        }

        built
            .remove(&self.root())
            .unwrap_or_else(|| LayoutNode::from_dock_node(&DockNode::default()))
    }

    /// Rebuild a tree from nested [`LayoutNode`]s.
    ///
    /// Nodes are created top-down, then one more walk fixes up every parent link.
    pub fn from_layout_node(layout: &LayoutNode) -> Self {
        let mut tree = Self::with_root(layout.to_dock_node());
        let mut stack = vec![(tree.root(), layout)];

        while let Some((id, layout)) = stack.pop() {
            for child_layout in &layout.children {
                let child = tree.insert_node(child_layout.to_dock_node());
                tree.push_child_unlinked(id, child);
                stack.push((child, child_layout));
            }
        }

        tree.relink_parents();
        tree
    }

    fn push_child_unlinked(&mut self, parent: DockNodeId, child: DockNodeId) {
        if let Some(node) = self.node_mut(parent) {
            node.push_child(child);
        }
    }

    /// Pretty JSON with a 4-space indent, the format of the layout file.
    ///
    /// # Errors
    /// [`LayoutPersistenceError::TooDeep`] past [`MAX_LAYOUT_DEPTH`], or a serializer failure.
    pub fn to_json_string(&self) -> Result<String, LayoutPersistenceError> {
        check_depth(self.depth())?;
        to_pretty_json(&self.to_layout_node())
    }

    /// # Errors
    /// Malformed JSON, missing fields, unknown split directions and trees deeper than
    /// [`MAX_LAYOUT_DEPTH`] are all reported.
    pub fn from_json_str(json: &str) -> Result<Self, LayoutPersistenceError> {
        let layout: LayoutNode = serde_json::from_str(json)?;
        check_depth(layout.depth())?;
        Ok(Self::from_layout_node(&layout))
    }

    /// # Errors
    /// [`LayoutPersistenceError::TooDeep`] past [`MAX_LAYOUT_DEPTH`], or a serializer failure.
    pub fn to_ron_string(&self) -> Result<String, LayoutPersistenceError> {
        check_depth(self.depth())?;
        Ok(ron_options().to_string_pretty(&self.to_layout_node(), pretty_ron_config())?)
    }

    /// # Errors
    /// Malformed RON, unknown split directions and trees deeper than [`MAX_LAYOUT_DEPTH`].
    pub fn from_ron_str(ron: &str) -> Result<Self, LayoutPersistenceError> {
        let layout: LayoutNode = ron_options().from_str(ron)?;
        check_depth(layout.depth())?;
        Ok(Self::from_layout_node(&layout))
    }

    /// Write the tree as JSON, replacing `path`.
    ///
    /// # Errors
    /// Serialization or io failures.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LayoutPersistenceError> {
        let json = self.to_json_string()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a JSON layout file.
    ///
    /// A file that doesn't exist is not an error: it means "no saved layout" and yields `Ok(None)`.
    ///
    /// # Errors
    /// Any other io failure, or content that doesn't parse as a layout.
    pub fn load_from_file(
        path: impl AsRef<Path>,
    ) -> Result<Option<Self>, LayoutPersistenceError> {
        match read_optional(path.as_ref())? {
            Some(json) => Self::from_json_str(&json).map(Some),
            None => Ok(None),
        }
    }
}

pub(crate) fn to_pretty_json(
    value: &impl serde::Serialize,
) -> Result<String, LayoutPersistenceError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Reads a file, treating a missing file as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, LayoutPersistenceError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no saved layout at {}", path.display());
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn ron_options() -> ron::Options {
    ron::Options::default().with_recursion_limit(RON_RECURSION_LIMIT)
}

fn pretty_ron_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(128)
        .separate_tuple_members(true)
}
