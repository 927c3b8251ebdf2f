//! Contains pure functions for collecting nodes along each XPath axis.
//!
//! Each collector starts from one context position and walks the tree through
//! the [`Navigator`] cursor protocol, appending results in the axis's order.
//! The shared `seen` set keeps a node from being collected twice when a step
//! runs over several context nodes.

use crate::navigator::{Navigator, NodeKind};
use std::collections::HashSet;

fn add_node<'a, N: Navigator<'a>>(node: N, seen: &mut HashSet<N>, results: &mut Vec<N>) {
    if seen.insert(node) {
        results.push(node);
    }
}

pub fn collect_self_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    add_node(node, seen, results);
}

pub fn collect_child_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    if !nav.move_to_first_child() {
        return;
    }
    add_node(nav, seen, results);
    while nav.move_to_next_sibling() {
        add_node(nav, seen, results);
    }
}

pub fn collect_attribute_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    while nav.move_to_next_attribute() {
        add_node(nav, seen, results);
    }
}

pub fn collect_descendant_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut child = node;
    if !child.move_to_first_child() {
        return;
    }
    loop {
        add_node(child, seen, results);
        collect_descendant_nodes(child, seen, results);
        if !child.move_to_next_sibling() {
            break;
        }
    }
}

pub fn collect_descendant_or_self_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    add_node(node, seen, results);
    collect_descendant_nodes(node, seen, results);
}

pub fn collect_parent_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    if nav.move_to_parent() {
        add_node(nav, seen, results);
    }
}

/// Nearest ancestor first. From an attribute position the owning element is
/// the first ancestor.
pub fn collect_ancestor_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    while nav.move_to_parent() {
        add_node(nav, seen, results);
    }
}

pub fn collect_ancestor_or_self_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    add_node(node, seen, results);
    collect_ancestor_nodes(node, seen, results);
}

pub fn collect_following_sibling_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    while nav.move_to_next_sibling() {
        add_node(nav, seen, results);
    }
}

/// Nearest sibling first, per the reverse axis order.
pub fn collect_preceding_sibling_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    while nav.move_to_previous_sibling() {
        add_node(nav, seen, results);
    }
}

/// Everything after the context node in document order, excluding its own
/// descendants. An attribute position starts from its owning element.
pub fn collect_following_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    if nav.node_kind() == NodeKind::Attribute {
        nav.move_to_parent();
    }
    loop {
        while nav.move_to_next_sibling() {
            collect_descendant_or_self_nodes(nav, seen, results);
        }
        if !nav.move_to_parent() {
            break;
        }
    }
}

/// Everything before the context node, excluding ancestors. Sibling subtrees
/// are visited nearest first, each subtree internally in document order.
pub fn collect_preceding_nodes<'a, N: Navigator<'a>>(
    node: N,
    seen: &mut HashSet<N>,
    results: &mut Vec<N>,
) {
    let mut nav = node;
    if nav.node_kind() == NodeKind::Attribute {
        nav.move_to_parent();
    }
    loop {
        while nav.move_to_previous_sibling() {
            collect_descendant_or_self_nodes(nav, seen, results);
        }
        if !nav.move_to_parent() {
            break;
        }
    }
}
