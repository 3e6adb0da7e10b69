//! Arena-backed dock node tree.
//!
//! Every node lives in a slot of [`DockTree`] and is addressed by a [`DockNodeId`]. Parent links
//! are ids too, so removing a subtree can never leave a dangling back-reference behind: a stale id
//! just stops resolving.

use std::collections::VecDeque;

use egui::{Pos2, Vec2};
use itertools::Itertools as _;

mod integrity;

#[cfg(test)]
pub(crate) mod tree_tests;

/// Index of a node inside a [`DockTree`].
///
/// Slots are never reused, so within one tree an id that was removed never aliases a node created
/// later. Ids are only meaningful for the tree that produced them: a tree that is loaded or rebuilt
/// (e.g. by [`crate::EditorLayout::reset`]) numbers its nodes afresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u32);

impl DockNodeId {
    fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

impl std::fmt::Display for DockNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a node divides the area it shares with its parent.
///
/// Stored as an integer in layout files: `0` horizontal, `1` vertical, `2` tab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(into = "u8", try_from = "u8"))]
pub enum DockDirection {
    /// Side by side, along the x axis.
    #[default]
    Horizontal,
    /// Stacked, along the y axis.
    Vertical,
    /// Sharing the same area as tabs.
    Tab,
}

impl From<DockDirection> for u8 {
    fn from(dir: DockDirection) -> Self {
        match dir {
            DockDirection::Horizontal => 0,
            DockDirection::Vertical => 1,
            DockDirection::Tab => 2,
        }
    }
}

impl TryFrom<u8> for DockDirection {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            2 => Ok(Self::Tab),
            other => Err(format!("unknown split direction {other}")),
        }
    }
}

pub(crate) fn sanitize_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// A leaf panel or a split container.
#[derive(Clone, Debug, PartialEq)]
pub struct DockNode {
    pub name: String,
    pub size: Vec2,
    pub position: Pos2,
    pub split_direction: DockDirection,
    pub visible: bool,
    split_ratio: f32,
    children: Vec<DockNodeId>,
    parent: Option<DockNodeId>,
}

impl Default for DockNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: Vec2::ZERO,
            position: Pos2::ZERO,
            split_direction: DockDirection::Horizontal,
            visible: true,
            split_ratio: 0.5,
            children: Vec::new(),
            parent: None,
        }
    }
}

impl DockNode {
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            name: name.into(),
            size,
            ..Self::default()
        }
    }

    /// Always in `0.0..=1.0`.
    pub fn split_ratio(&self) -> f32 {
        self.split_ratio
    }

    /// Clamped into `0.0..=1.0`; non-finite values reset to `0.5`.
    pub fn set_split_ratio(&mut self, ratio: f32) {
        self.split_ratio = sanitize_ratio(ratio);
    }

    pub fn children(&self) -> &[DockNodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<DockNodeId> {
        self.parent
    }

    pub(crate) fn push_child(&mut self, child: DockNodeId) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The dock layout of one editor window.
#[derive(Clone, Debug)]
pub struct DockTree {
    nodes: Vec<Option<DockNode>>,
    root: DockNodeId,
}

impl DockTree {
    pub fn new(root_name: impl Into<String>, size: Vec2) -> Self {
        Self::with_root(DockNode::new(root_name, size))
    }

    pub(crate) fn with_root(mut root: DockNode) -> Self {
        root.parent = None;
        Self {
            nodes: vec![Some(root)],
            root: DockNodeId(0),
        }
    }

    pub fn root(&self) -> DockNodeId {
        self.root
    }

    pub fn node(&self, id: DockNodeId) -> Option<&DockNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: DockNodeId) -> Option<&mut DockNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: DockNodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn parent(&self, id: DockNodeId) -> Option<DockNodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: DockNodeId) -> &[DockNodeId] {
        self.node(id).map(|n| n.children()).unwrap_or_default()
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert_node(&mut self, node: DockNode) -> DockNodeId {
        let id = DockNodeId::from_index(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    /// Create a node that is not attached anywhere yet. See [`Self::add_child`].
    pub fn create_node(&mut self, name: impl Into<String>, size: Vec2) -> DockNodeId {
        self.insert_node(DockNode::new(name, size))
    }

    /// Attach a detached node as the last child of `parent`.
    ///
    /// Refuses the root, nodes that already have a parent, and anything that would create a cycle.
    pub fn add_child(&mut self, parent: DockNodeId, child: DockNodeId) -> bool {
        if child == self.root || !self.contains(parent) {
            return false;
        }
        match self.node(child) {
            Some(node) if node.parent.is_none() => {}
            _ => return false,
        }
        if self.is_ancestor_or_self(child, parent) {
            log::warn!("add_child: attaching {child} under {parent} would create a cycle");
            return false;
        }

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    fn is_ancestor_or_self(&self, ancestor: DockNodeId, mut id: DockNodeId) -> bool {
        let mut steps = 0;
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) if steps <= self.nodes.len() => {
                    id = parent;
                    steps += 1;
                }
                _ => return false,
            }
        }
    }

    /// Create a new child under `node`.
    ///
    /// `direction` and `ratio` are recorded on the *new child*; `node`'s own split metadata is
    /// left as it was. The child starts unnamed.
    pub fn split(
        &mut self,
        node: DockNodeId,
        direction: DockDirection,
        ratio: f32,
    ) -> Option<DockNodeId> {
        if !self.contains(node) {
            return None;
        }

        let child = self.insert_node(DockNode {
            split_direction: direction,
            split_ratio: sanitize_ratio(ratio),
            parent: Some(node),
            ..DockNode::default()
        });
        if let Some(parent) = self.node_mut(node) {
            parent.children.push(child);
        }
        Some(child)
    }

    /// Detach `id` from its parent and free its whole subtree.
    ///
    /// Detached nodes made by [`Self::create_node`] are freed the same way. Removing the root or
    /// an id that is no longer live is a no-op returning `false`.
    pub fn remove_node(&mut self, id: DockNodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }

        if let Some(parent) = self.parent(id).and_then(|parent| self.node_mut(parent)) {
            parent.children.retain(|&c| c != id);
        }

        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id.index()).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Breadth-first search for the first node called `name`.
    pub fn find_node(&self, name: &str) -> Option<DockNodeId> {
        self.bfs().find(|&id| self.node(id).is_some_and(|n| n.name == name))
    }

    /// Every node reachable from the root, in breadth-first order.
    pub fn all_nodes(&self) -> Vec<DockNodeId> {
        self.bfs().collect()
    }

    fn bfs(&self) -> impl Iterator<Item = DockNodeId> + '_ {
        let mut queue: VecDeque<DockNodeId> = VecDeque::new();
        if self.contains(self.root) {
            queue.push_back(self.root);
        }
        std::iter::from_fn(move || {
            let current = queue.pop_front()?;
            queue.extend(self.children(current).iter().copied());
            Some(current)
        })
    }

    /// Number of levels below and including the root; a lone root has depth 1.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(DockNodeId, usize)> = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|&c| (c, depth + 1)));
        }
        max_depth
    }

    /// Recompute every parent link from the child lists, starting at the root.
    pub(crate) fn relink_parents(&mut self) {
        let mut stack = vec![(self.root, None)];
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            node.parent = parent;
            stack.extend(node.children.iter().map(|&c| (c, Some(id))));
        }
    }

    /// Consistency problems of the tree, one line each. Empty when healthy.
    pub fn integrity_issues(&self) -> Vec<String> {
        integrity::tree_integrity_issues(self)
    }

    /// Indented outline of the tree, cut off after `max_nodes` lines.
    pub fn debug_summary(&self, max_nodes: usize) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut stack: Vec<(DockNodeId, usize)> = vec![(self.root, 0)];

        while let Some((id, depth)) = stack.pop() {
            if lines.len() >= max_nodes {
                lines.push("...".to_owned());
                break;
            }
            let Some(node) = self.node(id) else {
                lines.push(format!("{:indent$}{id} MISSING", "", indent = depth * 2));
                continue;
            };
            lines.push(format!(
                "{:indent$}{id} {:?} {:?} ratio={:.3} visible={}",
                "",
                node.name,
                node.split_direction,
                node.split_ratio,
                node.visible,
                indent = depth * 2
            ));
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }

        format!("root={} nodes={}\n{}", self.root, self.len(), lines.iter().join("\n"))
    }
}
