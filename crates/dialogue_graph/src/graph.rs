// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live graph: nodes, connections and comment blocks being edited.

use crate::connection::{Connection, ConnectionId};
use crate::group::{CommentBlock, GroupId};
use crate::node::{Node, NodeId, NodeKind};
use crate::port::{Port, PortDirection, PortRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A dialogue graph under edit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueGraph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
    /// Comment blocks
    groups: IndexMap<GroupId, CommentBlock>,
}

impl DialogueGraph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            groups: IndexMap::new(),
        }
    }

    /// Add a node to the graph, replacing any node with the same ID
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Remove a node together with its connections and group memberships
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<Node, EditError> {
        let node = self
            .nodes
            .get(node_id)
            .ok_or_else(|| EditError::NodeNotFound(node_id.clone()))?;
        if !node.capabilities.deletable {
            return Err(EditError::NotDeletable(node_id.clone()));
        }

        self.connections.retain(|_, c| !c.involves_node(node_id));
        for group in self.groups.values_mut() {
            group.members.shift_remove(node_id);
        }
        self.nodes
            .shift_remove(node_id)
            .ok_or_else(|| EditError::NodeNotFound(node_id.clone()))
    }

    /// Move a node to a new position
    pub fn move_node(&mut self, node_id: &NodeId, position: [f32; 2]) -> Result<(), EditError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| EditError::NodeNotFound(node_id.clone()))?;
        if !node.capabilities.movable {
            return Err(EditError::NotMovable(node_id.clone()));
        }
        node.position = position;
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    /// Whether a node with this ID exists
    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes of one kind
    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.kind() == kind)
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The conversation entry point, if present
    pub fn entry_node(&self) -> Option<&Node> {
        self.nodes.values().find(|n| n.entry_point)
    }

    /// Resolve a port reference
    pub fn port(&self, port: &PortRef) -> Option<&Port> {
        self.nodes.get(&port.node)?.port(port.role)
    }

    fn resolve(&self, port: &PortRef) -> Result<&Port, ConnectionError> {
        let node = self
            .nodes
            .get(&port.node)
            .ok_or_else(|| ConnectionError::NodeNotFound(port.node.clone()))?;
        node.port(port.role)
            .ok_or_else(|| ConnectionError::PortNotFound(port.clone()))
    }

    /// Add a user-drawn connection between ports.
    ///
    /// Rejects incompatible port types, a second edge on a single-capacity
    /// port and self-loops.
    pub fn connect(&mut self, output: PortRef, input: PortRef) -> Result<ConnectionId, ConnectionError> {
        let source_port = self.resolve(&output)?;
        let target_port = self.resolve(&input)?;

        if source_port.direction != PortDirection::Output || target_port.direction != PortDirection::Input {
            return Err(ConnectionError::WrongDirection);
        }

        if !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }

        for (port, end) in [(source_port, &output), (target_port, &input)] {
            if !port.is_multi() && self.connections.values().any(|c| !c.is_in_flight() && c.involves_port(end)) {
                return Err(ConnectionError::PortAlreadyConnected(end.clone()));
            }
        }

        if output.node == input.node {
            return Err(ConnectionError::SelfLoop);
        }

        let connection = Connection::new(output, input);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Add a connection read from storage.
    ///
    /// Only checks that both ports exist and face the right way; stored
    /// data is trusted to respect capacities.
    pub fn link(&mut self, output: PortRef, input: PortRef) -> Result<ConnectionId, ConnectionError> {
        let source_port = self.resolve(&output)?;
        let target_port = self.resolve(&input)?;

        if source_port.direction != PortDirection::Output || target_port.direction != PortDirection::Input {
            return Err(ConnectionError::WrongDirection);
        }

        let connection = Connection::new(output, input);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Start dragging a wire from a port
    pub fn begin_connection(&mut self, from: PortRef) -> Result<ConnectionId, ConnectionError> {
        let port = self.resolve(&from)?;
        let connection = match port.direction {
            PortDirection::Output => Connection::dangling_from(from),
            PortDirection::Input => Connection::dangling_to(from),
        };
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Drop a dragged wire on a port.
    ///
    /// The in-flight connection is removed either way; on success it is
    /// replaced by a validated one.
    pub fn complete_connection(
        &mut self,
        connection_id: ConnectionId,
        to: PortRef,
    ) -> Result<ConnectionId, ConnectionError> {
        let pending = self
            .connections
            .get(&connection_id)
            .filter(|c| c.is_in_flight())
            .cloned()
            .ok_or(ConnectionError::NotInFlight(connection_id))?;
        self.connections.shift_remove(&connection_id);

        match (pending.output, pending.input) {
            (Some(output), None) => self.connect(output, to),
            (None, Some(input)) => self.connect(to, input),
            _ => Err(ConnectionError::NotInFlight(connection_id)),
        }
    }

    /// Abandon a dragged wire
    pub fn cancel_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        match self.connections.get(&connection_id) {
            Some(c) if c.is_in_flight() => self.connections.shift_remove(&connection_id),
            _ => None,
        }
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections leaving a specific port
    pub fn connections_from<'a>(&'a self, port: &'a PortRef) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .values()
            .filter(move |c| c.output.as_ref() == Some(port))
    }

    /// Get connections arriving at a specific port
    pub fn connections_to<'a>(&'a self, port: &'a PortRef) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .values()
            .filter(move |c| c.input.as_ref() == Some(port))
    }

    /// Get connections involving a node
    pub fn connections_for_node<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether any wire is still being dragged
    pub fn has_connection_in_flight(&self) -> bool {
        self.connections.values().any(Connection::is_in_flight)
    }

    /// Create an empty comment block
    pub fn create_comment_block(&mut self, title: impl Into<String>, position: [f32; 2]) -> GroupId {
        let block = CommentBlock::new(title, position);
        let id = block.id;
        self.groups.insert(id, block);
        id
    }

    /// Add a node to a comment block; false if either is missing
    pub fn add_to_group(&mut self, group_id: GroupId, node_id: &NodeId) -> bool {
        if !self.nodes.contains_key(node_id) {
            return false;
        }
        match self.groups.get_mut(&group_id) {
            Some(group) => {
                group.members.insert(node_id.clone());
                true
            }
            None => false,
        }
    }

    /// Get a comment block by ID
    pub fn group(&self, group_id: GroupId) -> Option<&CommentBlock> {
        self.groups.get(&group_id)
    }

    /// Get a mutable comment block by ID
    pub fn group_mut(&mut self, group_id: GroupId) -> Option<&mut CommentBlock> {
        self.groups.get_mut(&group_id)
    }

    /// Get all comment blocks
    pub fn groups(&self) -> impl Iterator<Item = &CommentBlock> {
        self.groups.values()
    }

    /// Remove a comment block; its nodes stay in the graph
    pub fn remove_group(&mut self, group_id: GroupId) -> Option<CommentBlock> {
        self.groups.shift_remove(&group_id)
    }

    /// Remove every comment block
    pub fn clear_groups(&mut self) {
        self.groups.clear();
    }

    /// Get the number of comment blocks
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Remove all nodes and connections.
    ///
    /// Comment blocks survive but lose their members.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
        for group in self.groups.values_mut() {
            group.members.clear();
        }
    }
}

impl Default for DialogueGraph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(PortRef),

    /// Endpoints are not an output and an input
    #[error("Connections must run from an output to an input")]
    WrongDirection,

    /// Incompatible port types
    #[error("Incompatible port types")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0}")]
    PortAlreadyConnected(PortRef),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// No wire with this ID is being dragged
    #[error("Connection is not in flight: {0:?}")]
    NotInFlight(ConnectionId),
}

/// Error when editing nodes
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Node cannot be deleted
    #[error("Node cannot be deleted: {0}")]
    NotDeletable(NodeId),

    /// Node cannot be moved
    #[error("Node cannot be moved: {0}")]
    NotMovable(NodeId),
}
