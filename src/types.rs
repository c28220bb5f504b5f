//! Core data types for the mind map.
//!
//! This module defines the nodes and edges of a map together with the
//! [`MindMap`] container whose mutation methods keep the edge set a forest.
//! All tree checks are delegated to [`crate::tree`].

use crate::constants::{CHILD_OFFSET, REPARENT_OFFSET, ROOT_NODE_LABEL};
use crate::error::TreeError;
use crate::tree;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Unique identifier for mind map nodes.
pub type NodeId = Uuid;

/// Unique identifier for edges.
pub type EdgeId = Uuid;

/// A single labelled node on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MindMapNode {
    /// Unique identifier for this node
    pub id: NodeId,
    /// Text shown inside the node
    pub label: String,
    /// Centre of the node on the canvas as (x, y) world coordinates
    pub position: (f32, f32),
}

impl MindMapNode {
    /// Creates a new node with a fresh ID.
    ///
    /// # Arguments
    ///
    /// * `label` - The text shown in the node
    /// * `position` - The (x, y) position on the canvas
    pub fn new(label: impl Into<String>, position: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            position,
        }
    }
}

/// A directed parent → child connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// The parent node
    pub source: NodeId,
    /// The child node
    pub target: NodeId,
}

impl Edge {
    /// Creates a new edge from `source` to `target` with a fresh ID.
    ///
    /// No validation happens here; see [`tree::validate_edge`].
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
        }
    }
}

/// The mind map: its nodes and the parent → child edges between them.
///
/// Fields are public for reading and rendering. Mutate through the methods
/// so the tree invariant holds: at most one parent per node, no cycles and
/// no edge pointing at a missing node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    /// All nodes, indexed by their ID
    pub nodes: HashMap<NodeId, MindMapNode>,
    /// All edges in creation order
    pub edges: Vec<Edge>,
}

impl MindMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding the single starting node at the origin.
    pub fn with_root() -> Self {
        let mut map = Self::new();
        map.add_node(MindMapNode::new(ROOT_NODE_LABEL, (0.0, 0.0)));
        map
    }

    /// Returns true if the map holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if a node with the given ID exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn require(&self, id: NodeId) -> Result<&MindMapNode, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::MissingNode(id))
    }

    /// Adds a detached node and returns its ID.
    pub fn add_node(&mut self, node: MindMapNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Creates a child of `parent`, placed to its right, and links it.
    ///
    /// # Returns
    ///
    /// The new node's ID, or [`TreeError::MissingNode`] if the parent is unknown.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let parent_pos = self.require(parent)?.position;
        let child = MindMapNode::new(
            label,
            (parent_pos.0 + CHILD_OFFSET.0, parent_pos.1 + CHILD_OFFSET.1),
        );
        let child_id = self.add_node(child);
        self.edges.push(Edge::new(parent, child_id));
        Ok(child_id)
    }

    /// Connects `source` as the parent of `target`.
    ///
    /// Rejected if either node is missing, if it would be a self loop, if the
    /// target already has a parent, or if it would close a cycle.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> Result<EdgeId, TreeError> {
        self.require(source)?;
        self.require(target)?;
        tree::validate_edge(&self.edges, source, target)?;
        let edge = Edge::new(source, target);
        let id = edge.id;
        self.edges.push(edge);
        Ok(id)
    }

    /// Checks whether [`MindMap::connect`] would accept the edge, without applying it.
    pub fn can_connect(&self, source: NodeId, target: NodeId) -> Result<(), TreeError> {
        self.require(source)?;
        self.require(target)?;
        tree::validate_edge(&self.edges, source, target)
    }

    /// Moves `node` under `new_parent`.
    ///
    /// The node's previous incoming edge is replaced and the node is placed
    /// below and to the right of its new parent. Its descendants are shifted
    /// by the same amount so the subtree keeps its shape.
    ///
    /// # Returns
    ///
    /// The IDs of every node whose position changed.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let old_pos = self.require(node)?.position;
        let parent_pos = self.require(new_parent)?.position;
        tree::validate_reparent(&self.edges, node, new_parent)?;

        if tree::parent_of(&self.edges, node) != Some(new_parent) {
            self.edges.retain(|e| e.target != node);
            self.edges.push(Edge::new(new_parent, node));
        }

        let new_pos = (
            parent_pos.0 + REPARENT_OFFSET.0,
            parent_pos.1 + REPARENT_OFFSET.1,
        );
        let delta = (new_pos.0 - old_pos.0, new_pos.1 - old_pos.1);
        let moved = tree::subtree(&self.edges, node);
        for id in &moved {
            if let Some(n) = self.nodes.get_mut(id) {
                n.position.0 += delta.0;
                n.position.1 += delta.1;
            }
        }
        Ok(moved)
    }

    /// Removes the incoming edge of `node`, turning it into a root.
    pub fn detach(&mut self, node: NodeId) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.target == node)?;
        Some(self.edges.remove(index))
    }

    /// Removes a single edge by ID.
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == edge_id)?;
        Some(self.edges.remove(index))
    }

    /// Removes `node` together with all of its descendants and every edge
    /// touching a removed node.
    ///
    /// # Returns
    ///
    /// The removed node IDs, `node` first. Empty if `node` does not exist.
    pub fn remove_subtree(&mut self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        let doomed = tree::subtree(&self.edges, node);
        let doomed_set: HashSet<NodeId> = doomed.iter().copied().collect();

        self.edges
            .retain(|e| !doomed_set.contains(&e.source) && !doomed_set.contains(&e.target));
        doomed
            .into_iter()
            .filter(|id| self.nodes.remove(id).is_some())
            .collect()
    }

    /// Removes the subtrees rooted at each of `ids`.
    ///
    /// IDs already removed as part of an earlier subtree are skipped.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut removed = Vec::new();
        for id in ids {
            removed.extend(self.remove_subtree(*id));
        }
        removed
    }

    /// Replaces the label of `node`, returning the previous label.
    pub fn rename(&mut self, node: NodeId, label: impl Into<String>) -> Result<String, TreeError> {
        let n = self.nodes.get_mut(&node).ok_or(TreeError::MissingNode(node))?;
        Ok(std::mem::replace(&mut n.label, label.into()))
    }

    /// Moves `node` to a new canvas position.
    pub fn move_node(&mut self, node: NodeId, position: (f32, f32)) -> Result<(), TreeError> {
        let n = self.nodes.get_mut(&node).ok_or(TreeError::MissingNode(node))?;
        n.position = position;
        Ok(())
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Returns the parent of `node`, if any.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        tree::parent_of(&self.edges, node)
    }

    /// Returns the direct children of `node`.
    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        tree::children_of(&self.edges, node)
    }

    /// Returns every descendant of `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        tree::descendants(&self.edges, node)
    }

    /// Returns all nodes without a parent.
    pub fn roots(&self) -> Vec<NodeId> {
        tree::roots(self.nodes.keys().copied(), &self.edges)
    }

    /// Validates the whole map: the edges form a forest and reference only
    /// existing nodes.
    pub fn check_tree(&self) -> Result<(), TreeError> {
        for edge in &self.edges {
            self.require(edge.source)?;
            self.require(edge.target)?;
        }
        tree::validate_tree(&self.edges)
    }
}
