use std::collections::{HashMap, HashSet};

use super::{DockNodeId, DockTree};

pub(super) fn tree_integrity_issues(tree: &DockTree) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    let root = tree.root();
    let Some(root_node) = tree.node(root) else {
        issues.push(format!("integrity: root {root} missing"));
        return issues;
    };
    if let Some(parent) = root_node.parent() {
        issues.push(format!("integrity: root {root} has parent {parent}"));
    }

    let mut visited: HashSet<DockNodeId> = HashSet::new();
    let mut parent_of: HashMap<DockNodeId, DockNodeId> = HashMap::new();
    let mut stack: Vec<DockNodeId> = vec![root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }

        let Some(node) = tree.node(id) else {
            issues.push(format!("integrity: missing node {id} (reachable)"));
            continue;
        };

        let ratio = node.split_ratio();
        if !(0.0..=1.0).contains(&ratio) {
            issues.push(format!("integrity: node {id} split ratio {ratio} out of range"));
        }

        let mut local_set: HashSet<DockNodeId> = HashSet::new();
        for &child in node.children() {
            if !local_set.insert(child) {
                issues.push(format!(
                    "integrity: parent {id} contains duplicate child {child}"
                ));
                continue;
            }

            let Some(child_node) = tree.node(child) else {
                issues.push(format!(
                    "integrity: parent {id} references missing child {child}"
                ));
                continue;
            };

            if child_node.parent() != Some(id) {
                issues.push(format!(
                    "integrity: child {child} of {id} points at parent {:?}",
                    child_node.parent()
                ));
            }

            if let Some(prev_parent) = parent_of.insert(child, id) {
                issues.push(format!(
                    "integrity: child {child} has multiple parents {prev_parent} and {id}"
                ));
            }

            stack.push(child);
        }
    }

    let total = tree.len();
    if visited.len() != total {
        issues.push(format!(
            "integrity: unreachable nodes {} of {}",
            total.saturating_sub(visited.len()),
            total
        ));
    }

    issues
}
