use std::collections::HashSet;

use egui::Vec2;

use super::{DockDirection, DockNodeId, DockTree};

fn assert_tree_ok(tree: &DockTree) {
    let issues = tree.integrity_issues();
    assert!(
        issues.is_empty(),
        "tree integrity failed:\n{}\n{}",
        issues.join("\n"),
        tree.debug_summary(64)
    );
}

fn name_of(tree: &DockTree, id: DockNodeId) -> &str {
    &tree.node(id).expect("live node").name
}

fn named_split(
    tree: &mut DockTree,
    node: DockNodeId,
    dir: DockDirection,
    ratio: f32,
    name: &str,
) -> DockNodeId {
    let id = tree.split(node, dir, ratio).expect("split target exists");
    tree.node_mut(id).expect("new node").name = name.to_owned();
    id
}

#[test]
fn properties_parent_is_viewport() {
    let mut tree = DockTree::new("Root", Vec2::new(1280.0, 720.0));
    let root = tree.root();
    let viewport = named_split(&mut tree, root, DockDirection::Horizontal, 0.75, "Viewport");
    named_split(&mut tree, viewport, DockDirection::Horizontal, 0.8, "Properties");

    let properties = tree.find_node("Properties").expect("Properties exists");
    let parent = tree.parent(properties).expect("Properties has a parent");
    assert_eq!(name_of(&tree, parent), "Viewport");
    assert_tree_ok(&tree);
}

#[test]
fn split_metadata_lands_on_child() {
    let mut tree = DockTree::new("Root", Vec2::new(100.0, 100.0));
    let root = tree.root();
    let child = tree.split(root, DockDirection::Vertical, 0.3).unwrap();

    let child_node = tree.node(child).unwrap();
    assert_eq!(child_node.split_direction, DockDirection::Vertical);
    assert!((child_node.split_ratio() - 0.3).abs() < f32::EPSILON, "ratio on child");
    assert_eq!(child_node.name, "");

    let root_node = tree.node(root).unwrap();
    assert_eq!(root_node.split_direction, DockDirection::Horizontal);
    assert!((root_node.split_ratio() - 0.5).abs() < f32::EPSILON, "root untouched");
}

#[test]
fn split_clamps_ratio() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let a = tree.split(root, DockDirection::Horizontal, 1.7).unwrap();
    let b = tree.split(root, DockDirection::Horizontal, -2.0).unwrap();
    let c = tree.split(root, DockDirection::Horizontal, f32::NAN).unwrap();
    assert_eq!(tree.node(a).unwrap().split_ratio(), 1.0);
    assert_eq!(tree.node(b).unwrap().split_ratio(), 0.0);
    assert_eq!(tree.node(c).unwrap().split_ratio(), 0.5);
    assert_tree_ok(&tree);
}

#[test]
fn split_missing_node_is_none() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let child = tree.split(root, DockDirection::Tab, 0.5).unwrap();
    assert!(tree.remove_node(child));
    assert_eq!(tree.split(child, DockDirection::Tab, 0.5), None);
}

#[test]
fn all_nodes_is_breadth_first_and_unique() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let a = named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "a");
    let b = named_split(&mut tree, root, DockDirection::Vertical, 0.5, "b");
    let a1 = named_split(&mut tree, a, DockDirection::Tab, 0.5, "a1");
    let b1 = named_split(&mut tree, b, DockDirection::Tab, 0.5, "b1");
    let a2 = named_split(&mut tree, a1, DockDirection::Tab, 0.5, "a2");

    let all = tree.all_nodes();
    assert_eq!(all, vec![root, a, b, a1, b1, a2]);
    assert_eq!(all.len(), tree.len());
}

#[test]
fn find_node_returns_shallowest_match() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let deep_parent = named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "x");
    let deep = named_split(&mut tree, deep_parent, DockDirection::Horizontal, 0.5, "dup");
    let shallow = named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "dup");

    assert_eq!(tree.find_node("dup"), Some(shallow));
    assert_ne!(tree.find_node("dup"), Some(deep));
    assert_eq!(tree.find_node("nope"), None);
}

#[test]
fn remove_root_is_noop() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "a");
    let before = tree.all_nodes();

    assert!(!tree.remove_node(root));
    assert_eq!(tree.all_nodes(), before);
    assert_eq!(name_of(&tree, root), "Root");
    assert_tree_ok(&tree);
}

#[test]
fn remove_frees_subtree() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let a = named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "a");
    let a1 = named_split(&mut tree, a, DockDirection::Tab, 0.5, "a1");
    let b = named_split(&mut tree, root, DockDirection::Vertical, 0.5, "b");

    assert!(tree.remove_node(a));
    assert!(!tree.contains(a));
    assert!(!tree.contains(a1));
    assert_eq!(tree.children(root), &[b]);
    assert_eq!(tree.len(), 2);
    assert!(!tree.remove_node(a), "stale ids are a no-op");

    // A fresh node never reuses a freed slot.
    let c = tree.split(root, DockDirection::Tab, 0.5).unwrap();
    assert_ne!(c, a);
    assert_ne!(c, a1);
    assert_tree_ok(&tree);
}

#[test]
fn add_child_rules() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let a = named_split(&mut tree, root, DockDirection::Horizontal, 0.5, "a");

    let loose = tree.create_node("Asset Browser", Vec2::new(10.0, 10.0));
    assert_eq!(tree.parent(loose), None);
    assert!(!tree.integrity_issues().is_empty(), "detached node is unreachable");

    assert!(tree.add_child(a, loose));
    assert_eq!(tree.parent(loose), Some(a));
    assert!(!tree.add_child(root, loose), "already attached");
    assert!(!tree.add_child(a, root), "root can't be attached");
    assert_tree_ok(&tree);

    let island = tree.create_node("island", Vec2::ZERO);
    let island_child = tree.split(island, DockDirection::Tab, 0.5).unwrap();
    assert!(!tree.add_child(island_child, island), "cycle");
    assert!(tree.add_child(root, island));
    assert_tree_ok(&tree);
}

#[derive(Clone)]
pub(crate) struct Rng(u64);

impl Rng {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    pub(crate) fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    pub(crate) fn next_ratio(&mut self) -> f32 {
        (self.next_u64() % 1001) as f32 / 1000.0
    }
}

/// A tree grown by `steps` random splits and removals. Nodes carry distinct names, positions and
/// visibility so snapshots can be compared field by field.
pub(crate) fn random_tree(rng: &mut Rng, steps: usize) -> DockTree {
    let mut tree = DockTree::new("Root", Vec2::new(800.0, 600.0));
    for step in 0..steps {
        let all = tree.all_nodes();
        let target = all[rng.next_usize(all.len())];
        if rng.next_usize(4) == 0 {
            tree.remove_node(target);
            continue;
        }
        let dir = [DockDirection::Horizontal, DockDirection::Vertical, DockDirection::Tab]
            [rng.next_usize(3)];
        let id = tree.split(target, dir, rng.next_ratio()).unwrap();
        let node = tree.node_mut(id).unwrap();
        node.name = format!("n{step}");
        node.position = egui::Pos2::new(step as f32, rng.next_usize(500) as f32);
        node.size = Vec2::new(rng.next_usize(800) as f32, rng.next_usize(600) as f32 + 0.5);
        node.visible = rng.next_usize(2) == 0;
    }
    tree
}

#[test]
fn random_split_remove_keeps_tree_consistent() {
    for seed in 0..32 {
        let mut rng = Rng::new(seed);
        let mut tree = DockTree::new("Root", Vec2::new(800.0, 600.0));

        for step in 0..200 {
            let all = tree.all_nodes();
            let target = all[rng.next_usize(all.len())];
            if rng.next_usize(3) == 0 {
                let expected = tree.len() - subtree_size(&tree, target);
                let removed = tree.remove_node(target);
                assert_eq!(removed, target != tree.root(), "seed={seed} step={step}");
                if removed {
                    assert_eq!(tree.len(), expected, "seed={seed} step={step}");
                }
            } else {
                let dir = [DockDirection::Horizontal, DockDirection::Vertical, DockDirection::Tab]
                    [rng.next_usize(3)];
                let id = tree.split(target, dir, rng.next_ratio()).unwrap();
                tree.node_mut(id).unwrap().name = format!("n{step}");
            }

            assert_tree_ok(&tree);
            let all = tree.all_nodes();
            let unique: HashSet<_> = all.iter().copied().collect();
            assert_eq!(unique.len(), all.len(), "seed={seed} step={step}");
            assert_eq!(all.len(), tree.len(), "seed={seed} step={step}");
        }
    }
}

fn subtree_size(tree: &DockTree, id: DockNodeId) -> usize {
    1 + tree
        .children(id)
        .iter()
        .map(|&c| subtree_size(tree, c))
        .sum::<usize>()
}

#[test]
fn detached_nodes_can_be_freed() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    let loose = tree.create_node("loose", Vec2::ZERO);
    let loose_child = tree.split(loose, DockDirection::Tab, 0.5).unwrap();
    assert_eq!(tree.len(), 3);

    assert!(tree.remove_node(loose));
    assert!(!tree.contains(loose));
    assert!(!tree.contains(loose_child));
    assert_eq!(tree.len(), 1);
    assert!(!tree.remove_node(root));
    assert_tree_ok(&tree);
}

#[test]
fn depth_counts_levels() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    assert_eq!(tree.depth(), 1);
    let mut last = tree.root();
    for _ in 0..5 {
        last = tree.split(last, DockDirection::Tab, 0.5).unwrap();
    }
    tree.split(tree.root(), DockDirection::Vertical, 0.5).unwrap();
    assert_eq!(tree.depth(), 6);
}

#[test]
fn debug_summary_lists_nodes() {
    let mut tree = DockTree::new("Root", Vec2::ZERO);
    let root = tree.root();
    named_split(&mut tree, root, DockDirection::Tab, 0.5, "Console");
    let summary = tree.debug_summary(16);
    assert!(summary.contains("\"Root\""), "{summary}");
    assert!(summary.contains("  #1 \"Console\" Tab"), "{summary}");
}
