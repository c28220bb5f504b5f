//! Change logging for node edits.
//!
//! Node additions, removals, moves and label edits are reported through the
//! `log` facade under the `mindmap_tool::changes` target, and the most recent
//! entries are kept for display in the log panel.

use crate::constants::CHANGE_LOG_CAPACITY;
use crate::types::NodeId;
use log::info;
use std::collections::VecDeque;
use std::fmt;

/// Log target used for change events.
pub const CHANGE_LOG_TARGET: &str = "mindmap_tool::changes";

/// A change made to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// A node was created
    Added {
        /// ID of the new node
        id: NodeId,
        /// Its initial label
        label: String,
    },
    /// A node was removed
    Removed {
        /// ID of the removed node
        id: NodeId,
    },
    /// A node changed position
    Moved {
        /// ID of the moved node
        id: NodeId,
    },
    /// A node's label was edited
    TextChanged {
        /// ID of the edited node
        id: NodeId,
        /// The new label
        label: String,
    },
}

impl fmt::Display for NodeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeChange::Added { id, label } => write!(f, "NodeAdded:{id}:{label}"),
            NodeChange::Removed { id } => write!(f, "NodeRemoved:{id}:"),
            NodeChange::Moved { id } => write!(f, "NodeMoved:{id}:"),
            NodeChange::TextChanged { id, label } => write!(f, "TextChanged:text:{id}:{label}"),
        }
    }
}

/// Records node changes when enabled.
#[derive(Debug, Clone)]
pub struct ChangeLogger {
    /// Whether changes are recorded at all
    pub enabled: bool,
    recent: VecDeque<String>,
}

impl Default for ChangeLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ChangeLogger {
    /// Creates a logger, enabled or not.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            recent: VecDeque::with_capacity(CHANGE_LOG_CAPACITY),
        }
    }

    /// Records a change. Does nothing while disabled.
    pub fn record(&mut self, change: NodeChange) {
        if !self.enabled {
            return;
        }
        let line = change.to_string();
        info!(target: CHANGE_LOG_TARGET, "{line}");
        if self.recent.len() == CHANGE_LOG_CAPACITY {
            self.recent.pop_front();
        }
        self.recent.push_back(line);
    }

    /// Records several changes in order.
    pub fn record_all(&mut self, changes: impl IntoIterator<Item = NodeChange>) {
        for change in changes {
            self.record(change);
        }
    }

    /// Most recent entries, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    /// Number of entries currently kept.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    /// Returns true if no entries are kept.
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Forgets the kept entries.
    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_change_formatting() {
        let id = Uuid::nil();
        assert_eq!(
            NodeChange::Added { id, label: "New Node".into() }.to_string(),
            format!("NodeAdded:{id}:New Node")
        );
        assert_eq!(NodeChange::Removed { id }.to_string(), format!("NodeRemoved:{id}:"));
        assert_eq!(NodeChange::Moved { id }.to_string(), format!("NodeMoved:{id}:"));
        assert_eq!(
            NodeChange::TextChanged { id, label: "Idea".into() }.to_string(),
            format!("TextChanged:text:{id}:Idea")
        );
    }

    #[test]
    fn test_disabled_logger_keeps_nothing() {
        let mut logger = ChangeLogger::new(false);
        logger.record(NodeChange::Moved { id: Uuid::new_v4() });
        assert!(logger.is_empty());
    }

    #[test]
    fn test_logger_is_bounded() {
        let mut logger = ChangeLogger::new(true);
        let ids: Vec<Uuid> = (0..CHANGE_LOG_CAPACITY + 5).map(|_| Uuid::new_v4()).collect();
        logger.record_all(ids.iter().map(|id| NodeChange::Removed { id: *id }));

        assert_eq!(logger.len(), CHANGE_LOG_CAPACITY);
        let first = logger.recent().next().unwrap().to_string();
        assert_eq!(first, format!("NodeRemoved:{}:", ids[5]));
    }
}
