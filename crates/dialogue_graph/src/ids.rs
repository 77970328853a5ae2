// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node identifier allocation.
//!
//! Identifiers read `"<TypeName>- <n>"`, for example `"DialogueNode- 3"`,
//! where `n` is the smallest non-negative integer not used by a live node
//! of the same kind. A candidate already held by a node of another kind
//! (possible only with hand-edited documents) is skipped too, so IDs stay
//! unique across the document. The entry node always gets [`ENTRY_NODE_ID`].

use crate::graph::DialogueGraph;
use crate::node::{NodeId, NodeKind, ENTRY_NODE_ID};

/// Format the identifier for slot `n` of a kind
pub fn format_node_id(kind: NodeKind, n: usize) -> NodeId {
    NodeId(format!("{}- {}", kind.type_name(), n))
}

/// Allocate an identifier for a new node of `kind`.
///
/// Pure: the caller must add the node to the graph before allocating again.
pub fn allocate_node_id(graph: &DialogueGraph, kind: NodeKind) -> NodeId {
    if kind == NodeKind::Entry {
        return NodeId::new(ENTRY_NODE_ID);
    }

    let mut n = 0;
    loop {
        let candidate = format_node_id(kind, n);
        if !graph.contains_node(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
