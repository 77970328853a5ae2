// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use crate::port::PortRef;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A connection between an output port and an input port.
///
/// While the user is dragging a wire one of the endpoints is still
/// missing; such a connection is "in flight" and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Output endpoint
    pub output: Option<PortRef>,
    /// Input endpoint
    pub input: Option<PortRef>,
}

impl Connection {
    /// Create a complete connection
    pub fn new(output: PortRef, input: PortRef) -> Self {
        Self {
            id: ConnectionId::new(),
            output: Some(output),
            input: Some(input),
        }
    }

    /// Create a connection that is still being dragged from `output`
    pub fn dangling_from(output: PortRef) -> Self {
        Self {
            id: ConnectionId::new(),
            output: Some(output),
            input: None,
        }
    }

    /// Create a connection that is still being dragged from `input`
    pub fn dangling_to(input: PortRef) -> Self {
        Self {
            id: ConnectionId::new(),
            output: None,
            input: Some(input),
        }
    }

    /// Whether either endpoint is still missing
    pub fn is_in_flight(&self) -> bool {
        self.output.is_none() || self.input.is_none()
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: &NodeId) -> bool {
        self.output.as_ref().is_some_and(|p| &p.node == node_id)
            || self.input.as_ref().is_some_and(|p| &p.node == node_id)
    }

    /// Check if this connection involves a specific port
    pub fn involves_port(&self, port: &PortRef) -> bool {
        self.output.as_ref() == Some(port) || self.input.as_ref() == Some(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortRole;

    #[test]
    fn test_in_flight() {
        let from = PortRef::new("DialogueNode- 0", PortRole::Output);
        let to = PortRef::new("EndNode- 0", PortRole::End);

        assert!(!Connection::new(from.clone(), to.clone()).is_in_flight());
        assert!(Connection::dangling_from(from.clone()).is_in_flight());
        assert!(Connection::dangling_to(to.clone()).is_in_flight());

        let conn = Connection::dangling_from(from.clone());
        assert!(conn.involves_node(&NodeId::from("DialogueNode- 0")));
        assert!(conn.involves_port(&from));
        assert!(!conn.involves_port(&to));
    }
}
