// SPDX-License-Identifier: MIT OR Apache-2.0
//! Comment blocks: titled visual groups of nodes.
//!
//! Groups are cosmetic. They carry no graph semantics and never affect
//! linking.

use crate::node::NodeId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default comment block size in the graph UI
pub const DEFAULT_COMMENT_BLOCK_SIZE: [f32; 2] = [300.0, 200.0];

/// Title of a freshly created comment block
pub const DEFAULT_COMMENT_BLOCK_TITLE: &str = "Comment Block";

/// Unique identifier for a comment block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    /// Create a new random group ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

/// A titled rectangle grouping nodes on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentBlock {
    /// Unique group ID
    pub id: GroupId,
    /// Title shown in the header
    pub title: String,
    /// Top-left position
    pub position: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
    /// Member nodes
    pub members: IndexSet<NodeId>,
}

impl CommentBlock {
    /// Create an empty comment block
    pub fn new(title: impl Into<String>, position: [f32; 2]) -> Self {
        Self {
            id: GroupId::new(),
            title: title.into(),
            position,
            size: DEFAULT_COMMENT_BLOCK_SIZE,
            members: IndexSet::new(),
        }
    }

    /// Whether a node belongs to this block
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.members.contains(node_id)
    }
}
