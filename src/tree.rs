//! Tree invariant checks over a mind map's edge list.
//!
//! Every function here is pure: it inspects a slice of [`Edge`]s and never
//! mutates it. The [`MindMap`](crate::MindMap) mutation methods call these
//! before touching their edge list, so a rejected change never leaves the
//! map half-updated.
//!
//! The invariant being protected:
//! - every node has at most one incoming edge (one parent)
//! - the edge set is acyclic
//!
//! Traversals keep a visited set so they terminate even if handed an edge
//! list that already violates the invariant.

use crate::error::TreeError;
use crate::types::{Edge, NodeId};
use std::collections::{HashSet, VecDeque};

/// Returns the parent of `node`, if it has one.
///
/// If the edge list is malformed and holds several incoming edges, the first
/// one wins.
pub fn parent_of(edges: &[Edge], node: NodeId) -> Option<NodeId> {
    edges.iter().find(|e| e.target == node).map(|e| e.source)
}

/// Returns the direct children of `node` in edge order.
pub fn children_of(edges: &[Edge], node: NodeId) -> Vec<NodeId> {
    edges
        .iter()
        .filter(|e| e.source == node)
        .map(|e| e.target)
        .collect()
}

/// Returns every node reachable from `root` along outgoing edges, in
/// breadth-first order. `root` itself is not included.
pub fn descendants(edges: &[Edge], root: NodeId) -> Vec<NodeId> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(root);
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    queue.push_back(root);
    let mut out = Vec::new();

    while let Some(current) = queue.pop_front() {
        for child in children_of(edges, current) {
            if visited.insert(child) {
                out.push(child);
                queue.push_back(child);
            }
        }
    }
    out
}

/// Returns `root` followed by all of its descendants.
pub fn subtree(edges: &[Edge], root: NodeId) -> Vec<NodeId> {
    let mut out = vec![root];
    out.extend(descendants(edges, root));
    out
}

/// Returns the chain of ancestors of `node`, nearest first.
pub fn ancestors(edges: &[Edge], node: NodeId) -> Vec<NodeId> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    seen.insert(node);
    let mut out = Vec::new();
    let mut current = parent_of(edges, node);

    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        out.push(id);
        current = parent_of(edges, id);
    }
    out
}

/// Returns true if `ancestor` lies strictly above `node` in the tree.
pub fn is_ancestor(edges: &[Edge], ancestor: NodeId, node: NodeId) -> bool {
    if ancestor == node {
        return false;
    }
    ancestors(edges, node).contains(&ancestor)
}

/// Checks whether adding the edge `source → target` keeps the edge set a
/// forest.
///
/// Node existence is the caller's concern; this only looks at the edges.
pub fn validate_edge(edges: &[Edge], source: NodeId, target: NodeId) -> Result<(), TreeError> {
    if source == target {
        return Err(TreeError::SelfLoop(source));
    }
    if let Some(parent) = parent_of(edges, target) {
        return Err(TreeError::AlreadyHasParent {
            child: target,
            parent,
        });
    }
    // Walking up from the source is enough: if the target were above it,
    // the new edge would close a loop.
    if is_ancestor(edges, target, source) {
        return Err(TreeError::WouldCreateCycle {
            parent: source,
            child: target,
        });
    }
    Ok(())
}

/// Checks whether `node` may be moved under `new_parent`.
///
/// The node's current incoming edge is ignored since re-parenting replaces
/// it. Moving a node beneath one of its own descendants is rejected.
pub fn validate_reparent(
    edges: &[Edge],
    node: NodeId,
    new_parent: NodeId,
) -> Result<(), TreeError> {
    if node == new_parent {
        return Err(TreeError::SelfLoop(node));
    }
    if is_ancestor(edges, node, new_parent) {
        return Err(TreeError::WouldCreateCycle {
            parent: new_parent,
            child: node,
        });
    }
    Ok(())
}

/// Validates a complete edge list: no self loops, at most one parent per
/// node and no cycles.
pub fn validate_tree(edges: &[Edge]) -> Result<(), TreeError> {
    let mut seen: Vec<&Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        if edge.source == edge.target {
            return Err(TreeError::SelfLoop(edge.source));
        }
        if let Some(existing) = seen.iter().find(|e| e.target == edge.target) {
            return Err(TreeError::AlreadyHasParent {
                child: edge.target,
                parent: existing.source,
            });
        }
        seen.push(edge);
    }

    // With single parents guaranteed, a cycle shows up as a parent chain
    // that returns to its start.
    for edge in edges {
        let mut current = Some(edge.source);
        let mut steps = 0;
        while let Some(id) = current {
            if id == edge.target {
                return Err(TreeError::WouldCreateCycle {
                    parent: edge.source,
                    child: edge.target,
                });
            }
            steps += 1;
            if steps > edges.len() {
                break;
            }
            current = parent_of(edges, id);
        }
    }
    Ok(())
}

/// Returns the nodes among `nodes` that have no parent, preserving input order.
pub fn roots<I>(nodes: I, edges: &[Edge]) -> Vec<NodeId>
where
    I: IntoIterator<Item = NodeId>,
{
    nodes
        .into_iter()
        .filter(|id| parent_of(edges, *id).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    /// Builds the tree a → b, a → c, b → d.
    fn sample() -> (Vec<NodeId>, Vec<Edge>) {
        let n = ids(4);
        let edges = vec![
            Edge::new(n[0], n[1]),
            Edge::new(n[0], n[2]),
            Edge::new(n[1], n[3]),
        ];
        (n, edges)
    }

    #[test]
    fn test_parent_and_children() {
        let (n, edges) = sample();
        assert_eq!(parent_of(&edges, n[3]), Some(n[1]));
        assert_eq!(parent_of(&edges, n[0]), None);
        assert_eq!(children_of(&edges, n[0]), vec![n[1], n[2]]);
        assert!(children_of(&edges, n[2]).is_empty());
    }

    #[test]
    fn test_descendants_are_breadth_first() {
        let (n, edges) = sample();
        assert_eq!(descendants(&edges, n[0]), vec![n[1], n[2], n[3]]);
        assert_eq!(descendants(&edges, n[1]), vec![n[3]]);
        assert!(descendants(&edges, n[3]).is_empty());
    }

    #[test]
    fn test_subtree_starts_with_root() {
        let (n, edges) = sample();
        assert_eq!(subtree(&edges, n[1]), vec![n[1], n[3]]);
    }

    #[test]
    fn test_descendants_terminate_on_cycle() {
        let n = ids(3);
        let edges = vec![
            Edge::new(n[0], n[1]),
            Edge::new(n[1], n[2]),
            Edge::new(n[2], n[0]),
        ];
        assert_eq!(descendants(&edges, n[0]), vec![n[1], n[2]]);
        assert_eq!(ancestors(&edges, n[0]), vec![n[2], n[1]]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (n, edges) = sample();
        assert_eq!(ancestors(&edges, n[3]), vec![n[1], n[0]]);
        assert!(ancestors(&edges, n[0]).is_empty());
    }

    #[test]
    fn test_is_ancestor_is_strict() {
        let (n, edges) = sample();
        assert!(is_ancestor(&edges, n[0], n[3]));
        assert!(is_ancestor(&edges, n[1], n[3]));
        assert!(!is_ancestor(&edges, n[2], n[3]));
        assert!(!is_ancestor(&edges, n[3], n[0]));
        assert!(!is_ancestor(&edges, n[0], n[0]));
    }

    #[test]
    fn test_validate_edge_accepts_new_leaf() {
        let (n, edges) = sample();
        let extra = Uuid::new_v4();
        assert!(validate_edge(&edges, n[2], extra).is_ok());
    }

    #[test]
    fn test_validate_edge_rejects_self_loop() {
        let (n, edges) = sample();
        assert_eq!(validate_edge(&edges, n[2], n[2]), Err(TreeError::SelfLoop(n[2])));
    }

    #[test]
    fn test_validate_edge_rejects_second_parent() {
        let (n, edges) = sample();
        assert_eq!(
            validate_edge(&edges, n[2], n[3]),
            Err(TreeError::AlreadyHasParent {
                child: n[3],
                parent: n[1],
            })
        );
    }

    #[test]
    fn test_validate_edge_rejects_cycle() {
        // Two separate chains so the target has no parent yet:
        // a → b → c and the proposed edge c → a.
        let n = ids(3);
        let edges = vec![Edge::new(n[0], n[1]), Edge::new(n[1], n[2])];
        assert_eq!(
            validate_edge(&edges, n[2], n[0]),
            Err(TreeError::WouldCreateCycle {
                parent: n[2],
                child: n[0],
            })
        );
    }

    #[test]
    fn test_validate_edge_between_separate_trees() {
        let n = ids(4);
        let edges = vec![Edge::new(n[0], n[1]), Edge::new(n[2], n[3])];
        assert!(validate_edge(&edges, n[1], n[2]).is_ok());
    }

    #[test]
    fn test_validate_reparent() {
        let (n, edges) = sample();
        // d under c: fine, its old parent b is ignored
        assert!(validate_reparent(&edges, n[3], n[2]).is_ok());
        // b under its own child d: cycle
        assert_eq!(
            validate_reparent(&edges, n[1], n[3]),
            Err(TreeError::WouldCreateCycle {
                parent: n[3],
                child: n[1],
            })
        );
        // root under a grandchild: cycle
        assert!(validate_reparent(&edges, n[0], n[3]).is_err());
        assert_eq!(validate_reparent(&edges, n[2], n[2]), Err(TreeError::SelfLoop(n[2])));
        // moving under the current parent is allowed
        assert!(validate_reparent(&edges, n[3], n[1]).is_ok());
    }

    #[test]
    fn test_validate_tree() {
        let (n, mut edges) = sample();
        assert!(validate_tree(&edges).is_ok());
        assert!(validate_tree(&[]).is_ok());

        edges.push(Edge::new(n[2], n[3]));
        assert!(matches!(
            validate_tree(&edges),
            Err(TreeError::AlreadyHasParent { .. })
        ));
    }

    #[test]
    fn test_validate_tree_detects_cycle_and_self_loop() {
        let n = ids(2);
        let cyclic = vec![Edge::new(n[0], n[1]), Edge::new(n[1], n[0])];
        assert!(matches!(
            validate_tree(&cyclic),
            Err(TreeError::WouldCreateCycle { .. })
        ));

        let looped = vec![Edge::new(n[0], n[0])];
        assert_eq!(validate_tree(&looped), Err(TreeError::SelfLoop(n[0])));
    }

    #[test]
    fn test_roots_preserve_order() {
        let (n, edges) = sample();
        let loose = Uuid::new_v4();
        let all = vec![loose, n[3], n[0], n[2]];
        assert_eq!(roots(all, &edges), vec![loose, n[0]]);
    }
}
