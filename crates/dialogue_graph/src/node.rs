// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the dialogue graph.
//!
//! The variant set is closed: every pass over the graph (builder, saver,
//! loader, creation palette) matches on [`NodeVariant`] exhaustively.

use crate::assets::{SpeakerRef, ValueRef};
use crate::port::{Port, PortCapacity, PortDirection, PortRole, PortType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the single entry node
pub const ENTRY_NODE_ID: &str = "Inicio";

/// Default node size in the graph UI
pub const DEFAULT_NODE_SIZE: [f32; 2] = [200.0, 150.0];

/// Unique identifier for a node within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The entry node's fixed ID
    pub fn entry() -> Self {
        Self(ENTRY_NODE_ID.to_string())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty identifier
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

/// Kind of node, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Conversation start
    Entry,
    /// A spoken line
    Dialogue,
    /// Two-way split on a predicate
    Branch,
    /// Raises a gameplay event
    Event,
    /// Conversation end
    End,
    /// Feeds a value into a predicate
    Value,
}

impl NodeKind {
    /// Kinds offered by the node creation palette, in menu order
    pub fn creatable() -> &'static [NodeKind] {
        &[
            NodeKind::Value,
            NodeKind::Dialogue,
            NodeKind::Branch,
            NodeKind::Event,
            NodeKind::End,
        ]
    }

    /// Prefix used when allocating identifiers
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Entry => ENTRY_NODE_ID,
            NodeKind::Dialogue => "DialogueNode",
            NodeKind::Branch => "BranchNode",
            NodeKind::Event => "EventNode",
            NodeKind::End => "EndNode",
            NodeKind::Value => "ValueNode",
        }
    }

    /// Title a freshly created node starts with
    pub fn default_title(&self) -> &'static str {
        match self {
            NodeKind::Entry => ENTRY_NODE_ID,
            NodeKind::Dialogue => "Dialogue Option",
            NodeKind::Branch => "Branch",
            NodeKind::Event => "Event",
            NodeKind::End => "End",
            NodeKind::Value => "Value Node",
        }
    }

    /// Label in the node creation palette
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Entry => "Entry",
            NodeKind::Dialogue => "Dialogue Node",
            NodeKind::Branch => "Branch",
            NodeKind::Event => "Event",
            NodeKind::End => "End Node",
            NodeKind::Value => "Value Node",
        }
    }
}

/// Editing capabilities of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Can be dragged
    pub movable: bool,
    /// Can be deleted
    pub deletable: bool,
    /// Can be selected
    pub selectable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            movable: true,
            deletable: true,
            selectable: true,
        }
    }
}

/// Entry node ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryNode {
    /// Start of the conversation
    pub output: Port,
}

/// A spoken line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// Option title shown to the player
    pub title: String,
    /// Body text
    pub body: String,
    /// Who says it
    pub speaker: Option<SpeakerRef>,
    /// Flow in
    pub input: Port,
    /// Flow out
    pub output: Port,
}

/// Two-way split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    /// Flow in
    pub input: Port,
    /// Value deciding the branch
    pub predicate: Port,
    /// Taken when the predicate holds
    pub true_output: Port,
    /// Taken otherwise
    pub false_output: Port,
}

/// Raises a gameplay event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNode {
    /// Value raised by the event
    pub data: Option<ValueRef>,
    /// Flow in
    pub input: Port,
    /// Flow out
    pub output: Port,
}

/// Conversation end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndNode {
    /// Flow in
    pub input: Port,
}

/// Feeds a value into a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    /// Value read by consumers
    pub data: Option<ValueRef>,
    /// Value out
    pub output: Port,
}

/// Variant-specific payload and ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeVariant {
    /// Conversation start
    Entry(EntryNode),
    /// A spoken line
    Dialogue(DialogueNode),
    /// Two-way split
    Branch(BranchNode),
    /// Gameplay event
    Event(EventNode),
    /// Conversation end
    End(EndNode),
    /// Predicate value
    Value(ValueNode),
}

impl NodeVariant {
    /// Kind of this variant
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeVariant::Entry(_) => NodeKind::Entry,
            NodeVariant::Dialogue(_) => NodeKind::Dialogue,
            NodeVariant::Branch(_) => NodeKind::Branch,
            NodeVariant::Event(_) => NodeKind::Event,
            NodeVariant::End(_) => NodeKind::End,
            NodeVariant::Value(_) => NodeKind::Value,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Size in the graph UI
    pub size: [f32; 2],
    /// Whether this is the conversation entry point
    pub entry_point: bool,
    /// Editing capabilities
    pub capabilities: Capabilities,
    /// Payload and ports
    pub variant: NodeVariant,
}

impl Node {
    /// Create a node with default size and capabilities
    pub fn new(id: NodeId, position: [f32; 2], variant: NodeVariant) -> Self {
        Self {
            id,
            position,
            size: DEFAULT_NODE_SIZE,
            entry_point: false,
            capabilities: Capabilities::default(),
            variant,
        }
    }

    /// Kind of this node
    pub fn kind(&self) -> NodeKind {
        self.variant.kind()
    }

    /// Title shown in the node header
    pub fn title(&self) -> &str {
        match &self.variant {
            NodeVariant::Dialogue(dialogue) => &dialogue.title,
            other => other.kind().default_title(),
        }
    }

    /// Get a port by role
    pub fn port(&self, role: PortRole) -> Option<&Port> {
        self.ports().find(|p| p.role == role)
    }

    /// Get all ports, inputs first
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        let ports: Vec<&Port> = match &self.variant {
            NodeVariant::Entry(n) => vec![&n.output],
            NodeVariant::Dialogue(n) => vec![&n.input, &n.output],
            NodeVariant::Branch(n) => vec![&n.input, &n.predicate, &n.true_output, &n.false_output],
            NodeVariant::Event(n) => vec![&n.input, &n.output],
            NodeVariant::End(n) => vec![&n.input],
            NodeVariant::Value(n) => vec![&n.output],
        };
        ports.into_iter()
    }

    /// Get the input ports
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports().filter(|p| p.direction == PortDirection::Input)
    }

    /// Get the output ports
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports().filter(|p| p.direction == PortDirection::Output)
    }

    /// The flow input that incoming conversation edges attach to
    pub fn flow_input(&self) -> Option<&Port> {
        match &self.variant {
            NodeVariant::Dialogue(n) => Some(&n.input),
            NodeVariant::Branch(n) => Some(&n.input),
            NodeVariant::Event(n) => Some(&n.input),
            NodeVariant::End(n) => Some(&n.input),
            NodeVariant::Entry(_) | NodeVariant::Value(_) => None,
        }
    }

    /// The secondary input that value nodes feed
    pub fn predicate_input(&self) -> Option<&Port> {
        match &self.variant {
            NodeVariant::Branch(n) => Some(&n.predicate),
            _ => None,
        }
    }

    /// The output a stored link with `role_label` leaves from.
    ///
    /// Branch nodes map `True` to their true output and anything else to
    /// their false output. Every other variant has a single output.
    pub fn output_for_link(&self, role_label: &str) -> Option<&Port> {
        match &self.variant {
            NodeVariant::Entry(n) => Some(&n.output),
            NodeVariant::Dialogue(n) => Some(&n.output),
            NodeVariant::Branch(n) if role_label == PortRole::True.label() => Some(&n.true_output),
            NodeVariant::Branch(n) => Some(&n.false_output),
            NodeVariant::Event(n) => Some(&n.output),
            NodeVariant::Value(n) => Some(&n.output),
            NodeVariant::End(_) => None,
        }
    }
}

/// Shorthand for the ports every variant is built with
pub(crate) fn flow_port(direction: PortDirection, role: PortRole, capacity: PortCapacity) -> Port {
    match direction {
        PortDirection::Input => Port::input(role, PortType::Flow, capacity),
        PortDirection::Output => Port::output(role, PortType::Flow, capacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeBuilder;
    use crate::graph::DialogueGraph;

    #[test]
    fn test_branch_output_selection() {
        let graph = DialogueGraph::new("test");
        let branch = NodeBuilder::new(&graph).branch(None, [0.0, 0.0]);

        assert_eq!(branch.output_for_link("True").map(|p| p.role), Some(PortRole::True));
        assert_eq!(branch.output_for_link("False").map(|p| p.role), Some(PortRole::False));
        assert_eq!(branch.output_for_link("anything").map(|p| p.role), Some(PortRole::False));
    }

    #[test]
    fn test_port_lists() {
        let graph = DialogueGraph::new("test");
        let builder = NodeBuilder::new(&graph);

        let branch = builder.branch(None, [0.0, 0.0]);
        assert_eq!(branch.inputs().count(), 2);
        assert_eq!(branch.outputs().count(), 2);

        let end = builder.end(None, [0.0, 0.0]);
        assert_eq!(end.inputs().count(), 1);
        assert_eq!(end.outputs().count(), 0);
        assert!(end.output_for_link("Output").is_none());

        let value = builder.value(None, None, [0.0, 0.0]);
        assert!(value.flow_input().is_none());
        assert_eq!(value.outputs().count(), 1);
    }

    #[test]
    fn test_titles() {
        let graph = DialogueGraph::new("test");
        let builder = NodeBuilder::new(&graph);
        let dialogue = builder.dialogue(None, "Hi", "Hello there", None, [0.0, 0.0]);
        assert_eq!(dialogue.title(), "Hi");
        assert_eq!(builder.event(None, None, [0.0, 0.0]).title(), "Event");
    }
}
