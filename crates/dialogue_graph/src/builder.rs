// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node construction.
//!
//! There is exactly one constructor per variant, used both when the user
//! places a node and when a document is loaded. Sharing the path is what
//! keeps save/load round trips structurally faithful.

use crate::assets::{SpeakerRef, ValueRef};
use crate::graph::DialogueGraph;
use crate::ids::allocate_node_id;
use crate::node::{
    flow_port, BranchNode, Capabilities, DialogueNode, EndNode, EntryNode, EventNode, Node, NodeId,
    NodeKind, NodeVariant, ValueNode,
};
use crate::port::{Port, PortCapacity, PortDirection, PortRole, PortType};

/// Where the entry node sits
pub const ENTRY_NODE_POSITION: [f32; 2] = [100.0, 200.0];

/// Entry node size
pub const ENTRY_NODE_SIZE: [f32; 2] = [100.0, 150.0];

/// Body text of a freshly placed dialogue node
pub const DEFAULT_DIALOGUE_TEXT: &str = "Dialogue Text";

/// Builds nodes against the current state of a graph.
///
/// The builder only reads the graph (to allocate identifiers and to
/// enforce the single entry point); adding the result is up to the caller.
pub struct NodeBuilder<'a> {
    graph: &'a DialogueGraph,
}

impl<'a> NodeBuilder<'a> {
    /// Create a builder for a graph
    pub fn new(graph: &'a DialogueGraph) -> Self {
        Self { graph }
    }

    /// A stored identifier is kept verbatim, even when empty; only `None`
    /// allocates a fresh one.
    fn id_or_allocate(&self, id: Option<NodeId>, kind: NodeKind) -> NodeId {
        id.unwrap_or_else(|| allocate_node_id(self.graph, kind))
    }

    /// Build the entry node, or `None` if the graph already has one
    pub fn entry(&self) -> Option<Node> {
        if self.graph.entry_node().is_some() {
            return None;
        }

        let output = flow_port(PortDirection::Output, PortRole::Start, PortCapacity::Multi);
        let mut node = Node::new(
            allocate_node_id(self.graph, NodeKind::Entry),
            ENTRY_NODE_POSITION,
            NodeVariant::Entry(EntryNode { output }),
        );
        node.size = ENTRY_NODE_SIZE;
        node.entry_point = true;
        node.capabilities = Capabilities {
            movable: false,
            deletable: false,
            ..Capabilities::default()
        };
        Some(node)
    }

    /// Build a dialogue node
    pub fn dialogue(
        &self,
        id: Option<NodeId>,
        title: impl Into<String>,
        body: impl Into<String>,
        speaker: Option<SpeakerRef>,
        position: [f32; 2],
    ) -> Node {
        let id = self.id_or_allocate(id, NodeKind::Dialogue);
        Node::new(
            id,
            position,
            NodeVariant::Dialogue(DialogueNode {
                title: title.into(),
                body: body.into(),
                speaker,
                input: flow_port(PortDirection::Input, PortRole::Input, PortCapacity::Multi),
                output: flow_port(PortDirection::Output, PortRole::Output, PortCapacity::Multi),
            }),
        )
    }

    /// Build a branch node
    pub fn branch(&self, id: Option<NodeId>, position: [f32; 2]) -> Node {
        let id = self.id_or_allocate(id, NodeKind::Branch);
        Node::new(
            id,
            position,
            NodeVariant::Branch(BranchNode {
                input: flow_port(PortDirection::Input, PortRole::Input, PortCapacity::Multi),
                predicate: Port::input(PortRole::Predicate, PortType::Value, PortCapacity::Single),
                true_output: flow_port(PortDirection::Output, PortRole::True, PortCapacity::Single),
                false_output: flow_port(PortDirection::Output, PortRole::False, PortCapacity::Single),
            }),
        )
    }

    /// Build an event node
    pub fn event(&self, id: Option<NodeId>, data: Option<ValueRef>, position: [f32; 2]) -> Node {
        let id = self.id_or_allocate(id, NodeKind::Event);
        Node::new(
            id,
            position,
            NodeVariant::Event(EventNode {
                data,
                input: flow_port(PortDirection::Input, PortRole::Input, PortCapacity::Multi),
                output: flow_port(PortDirection::Output, PortRole::Output, PortCapacity::Single),
            }),
        )
    }

    /// Build an end node
    pub fn end(&self, id: Option<NodeId>, position: [f32; 2]) -> Node {
        let id = self.id_or_allocate(id, NodeKind::End);
        Node::new(
            id,
            position,
            NodeVariant::End(EndNode {
                input: flow_port(PortDirection::Input, PortRole::End, PortCapacity::Multi),
            }),
        )
    }

    /// Build a value node
    pub fn value(&self, id: Option<NodeId>, data: Option<ValueRef>, position: [f32; 2]) -> Node {
        let id = self.id_or_allocate(id, NodeKind::Value);
        Node::new(
            id,
            position,
            NodeVariant::Value(ValueNode {
                data,
                output: Port::output(PortRole::Value, PortType::Value, PortCapacity::Multi),
            }),
        )
    }

    /// Build a node of `kind` with the creation palette's defaults.
    ///
    /// Returns `None` only for a second entry node.
    pub fn with_defaults(&self, kind: NodeKind, position: [f32; 2]) -> Option<Node> {
        let node = match kind {
            NodeKind::Entry => return self.entry(),
            NodeKind::Dialogue => self.dialogue(
                None,
                NodeKind::Dialogue.default_title(),
                DEFAULT_DIALOGUE_TEXT,
                None,
                position,
            ),
            NodeKind::Branch => self.branch(None, position),
            NodeKind::Event => self.event(None, None, position),
            NodeKind::End => self.end(None, position),
            NodeKind::Value => self.value(None, None, position),
        };
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry() {
        let mut graph = DialogueGraph::new("test");
        let first = NodeBuilder::new(&graph).entry().unwrap();
        assert_eq!(first.id, NodeId::entry());
        assert!(first.entry_point);
        assert!(!first.capabilities.movable);
        assert!(!first.capabilities.deletable);
        assert!(first.flow_input().is_none());
        graph.add_node(first);

        for _ in 0..3 {
            assert!(NodeBuilder::new(&graph).entry().is_none());
            assert!(NodeBuilder::new(&graph).with_defaults(NodeKind::Entry, [0.0, 0.0]).is_none());
        }
        assert_eq!(graph.nodes().filter(|n| n.entry_point).count(), 1);
    }

    #[test]
    fn test_explicit_id_is_kept() {
        let graph = DialogueGraph::new("test");
        let node = NodeBuilder::new(&graph).event(Some(NodeId::from("EventNode- 7")), None, [1.0, 2.0]);
        assert_eq!(node.id, NodeId::from("EventNode- 7"));
        assert_eq!(node.position, [1.0, 2.0]);

        // Stored IDs are never reallocated, even empty ones
        let node = NodeBuilder::new(&graph).event(Some(NodeId::from("")), None, [0.0, 0.0]);
        assert_eq!(node.id, NodeId::from(""));

        let node = NodeBuilder::new(&graph).event(None, None, [0.0, 0.0]);
        assert_eq!(node.id, NodeId::from("EventNode- 0"));
    }

    #[test]
    fn test_palette_defaults() {
        let graph = DialogueGraph::new("test");
        let builder = NodeBuilder::new(&graph);
        let node = builder.with_defaults(NodeKind::Dialogue, [10.0, 20.0]).unwrap();
        match &node.variant {
            NodeVariant::Dialogue(dialogue) => {
                assert_eq!(dialogue.title, "Dialogue Option");
                assert_eq!(dialogue.body, "Dialogue Text");
                assert!(dialogue.speaker.is_none());
            }
            other => panic!("unexpected variant {other:?}"),
        }

        for kind in NodeKind::creatable() {
            let node = builder.with_defaults(*kind, [0.0, 0.0]).unwrap();
            assert_eq!(node.kind(), *kind);
            assert!(!node.entry_point);
        }
    }

    #[test]
    fn test_branch_ports() {
        let graph = DialogueGraph::new("test");
        let node = NodeBuilder::new(&graph).branch(None, [0.0, 0.0]);
        let roles: Vec<_> = node.ports().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![PortRole::Input, PortRole::Predicate, PortRole::True, PortRole::False]
        );
        assert_eq!(node.predicate_input().map(|p| p.port_type), Some(PortType::Value));
    }
}
