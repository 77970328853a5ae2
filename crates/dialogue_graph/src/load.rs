// SPDX-License-Identifier: MIT OR Apache-2.0
//! Container to graph reconstruction.
//!
//! Loading runs in three passes: build every stored node through
//! [`NodeBuilder`] with its stored identifier, reconnect ports from the link
//! records, then rebuild comment blocks. All nodes exist before the first
//! link is made, so record order never matters.

use crate::builder::NodeBuilder;
use crate::container::{DialogueContainer, LinkRecord};
use crate::graph::DialogueGraph;
use crate::node::{Node, NodeId, NodeKind};
use crate::port::PortRef;

/// Kinds whose nodes originate links, after the entry node
const LINK_SOURCE_KINDS: [NodeKind; 4] = [
    NodeKind::Dialogue,
    NodeKind::Branch,
    NodeKind::Event,
    NodeKind::Value,
];

/// Counts from one load, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Nodes rebuilt, excluding the entry node
    pub nodes: usize,
    /// Records skipped because their identifier was already taken
    pub duplicate_nodes: usize,
    /// Connections made
    pub links: usize,
    /// Link records that could not be resolved
    pub dropped_links: usize,
    /// Comment blocks rebuilt
    pub comment_blocks: usize,
}

/// Remove everything and put back a fresh entry node
pub fn reset_graph(graph: &mut DialogueGraph) {
    graph.clear();
    if let Some(entry) = NodeBuilder::new(graph).entry() {
        graph.add_node(entry);
    }
}

/// Replace the live graph with the content of `container`
pub fn load_graph(graph: &mut DialogueGraph, container: &DialogueContainer) -> LoadSummary {
    let mut summary = LoadSummary::default();

    reset_graph(graph);
    build_nodes(graph, container, &mut summary);
    link_nodes(graph, container, &mut summary);
    build_comment_blocks(graph, container, &mut summary);

    tracing::debug!(
        nodes = summary.nodes,
        links = summary.links,
        dropped = summary.dropped_links,
        groups = summary.comment_blocks,
        "Rebuilt graph {}",
        graph.name
    );
    summary
}

fn insert(graph: &mut DialogueGraph, node: Node, summary: &mut LoadSummary) {
    if graph.contains_node(&node.id) {
        tracing::warn!("Skipping stored node with duplicate id {}", node.id);
        summary.duplicate_nodes += 1;
        return;
    }
    graph.add_node(node);
    summary.nodes += 1;
}

fn build_nodes(graph: &mut DialogueGraph, container: &DialogueContainer, summary: &mut LoadSummary) {
    for record in &container.branch_nodes {
        let node = NodeBuilder::new(graph).branch(Some(record.node_id.clone()), record.position);
        insert(graph, node, summary);
    }

    for record in &container.event_nodes {
        let node = NodeBuilder::new(graph).event(Some(record.node_id.clone()), record.data.clone(), record.position);
        insert(graph, node, summary);
    }

    for record in &container.dialogue_nodes {
        let node = NodeBuilder::new(graph).dialogue(
            Some(record.node_id.clone()),
            record.title.clone(),
            record.body.clone(),
            record.speaker.clone(),
            record.position,
        );
        insert(graph, node, summary);
    }

    for record in &container.end_nodes {
        let node = NodeBuilder::new(graph).end(Some(record.node_id.clone()), record.position);
        insert(graph, node, summary);
    }

    for record in &container.value_nodes {
        let node = NodeBuilder::new(graph).value(Some(record.node_id.clone()), record.data.clone(), record.position);
        insert(graph, node, summary);
    }
}

/// Resolve one stored link leaving `source` to a pair of ports.
///
/// Value nodes feed the target's predicate input; everything else feeds
/// the target's flow input.
fn resolve_link(graph: &DialogueGraph, source: &Node, link: &LinkRecord) -> Option<(PortRef, PortRef)> {
    let target = graph.node(&link.target_id)?;
    let output = source.output_for_link(&link.source_port_role)?;
    let input = match source.kind() {
        NodeKind::Value => target.predicate_input()?,
        _ => target.flow_input()?,
    };
    Some((
        PortRef::new(&source.id, output.role),
        PortRef::new(&target.id, input.role),
    ))
}

fn link_nodes(graph: &mut DialogueGraph, container: &DialogueContainer, summary: &mut LoadSummary) {
    let mut sources: Vec<NodeId> = graph.entry_node().map(|n| n.id.clone()).into_iter().collect();
    for kind in LINK_SOURCE_KINDS {
        sources.extend(graph.nodes_of(kind).map(|n| n.id.clone()));
    }

    let mut planned = Vec::new();
    for source_id in &sources {
        let Some(source) = graph.node(source_id) else {
            continue;
        };
        for link in container.links.iter().filter(|l| &l.source_id == source_id) {
            match resolve_link(graph, source, link) {
                Some(pair) => planned.push(pair),
                None => tracing::debug!(
                    "Dropping link {} -[{}]-> {}",
                    link.source_id,
                    link.source_port_role,
                    link.target_id
                ),
            }
        }
    }

    for (output, input) in planned {
        match graph.link(output, input) {
            Ok(_) => summary.links += 1,
            Err(e) => tracing::debug!("Dropping link: {e}"),
        }
    }
    summary.dropped_links = container.links.len().saturating_sub(summary.links);
}

fn build_comment_blocks(graph: &mut DialogueGraph, container: &DialogueContainer, summary: &mut LoadSummary) {
    graph.clear_groups();

    for record in &container.comment_blocks {
        let group = graph.create_comment_block(record.title.clone(), record.position);
        for member in &record.member_node_ids {
            graph.add_to_group(group, member);
        }
        summary.comment_blocks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{SpeakerRef, ValueRef};
    use crate::container::{
        BranchNodeRecord, CommentBlockRecord, DialogueNodeRecord, EndNodeRecord, ValueNodeRecord,
    };
    use crate::node::NodeVariant;
    use crate::port::PortRole;
    use crate::save::save_graph;
    use std::collections::HashSet;

    fn edge_set(graph: &DialogueGraph) -> HashSet<(PortRef, PortRef)> {
        graph
            .connections()
            .filter_map(|c| Some((c.output.clone()?, c.input.clone()?)))
            .collect()
    }

    fn add_branch_fixture(container: &mut DialogueContainer) {
        container.branch_nodes.push(BranchNodeRecord {
            node_id: NodeId::from("BranchNode- 0"),
            position: [0.0, 0.0],
        });
        for n in 0..2 {
            container.end_nodes.push(EndNodeRecord {
                node_id: NodeId::from(format!("EndNode- {n}")),
                position: [0.0, 0.0],
            });
        }
    }

    #[test]
    fn test_load_template() {
        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &DialogueContainer::template());

        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.links, 1);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.entry_node().is_some());
        assert!(edge_set(&graph).contains(&(
            PortRef::new(NodeId::entry(), PortRole::Start),
            PortRef::new("DialogueNode- 0", PortRole::Input),
        )));
    }

    #[test]
    fn test_round_trip_example_chain() {
        let mut graph = DialogueGraph::new("test");
        reset_graph(&mut graph);
        let dialogue = NodeBuilder::new(&graph).dialogue(None, "Hi", "Hello", Some(SpeakerRef::new("Ana")), [1.0, 2.0]);
        let dialogue = graph.add_node(dialogue);
        let end = NodeBuilder::new(&graph).end(None, [3.0, 4.0]);
        let end = graph.add_node(end);
        graph
            .connect(PortRef::new(NodeId::entry(), PortRole::Start), PortRef::new(&dialogue, PortRole::Input))
            .unwrap();
        graph
            .connect(PortRef::new(&dialogue, PortRole::Output), PortRef::new(&end, PortRole::End))
            .unwrap();

        let mut container = DialogueContainer::new();
        save_graph(&graph, &mut container);
        assert_eq!(container.dialogue_nodes.len(), 1);
        assert_eq!(container.end_nodes.len(), 1);
        assert_eq!(container.links.len(), 2);

        let mut reloaded = DialogueGraph::new("test");
        load_graph(&mut reloaded, &container);

        assert_eq!(reloaded.node_count(), 3);
        assert_eq!(reloaded.connection_count(), 2);
        for node in graph.nodes() {
            assert_eq!(reloaded.node(&node.id), Some(node));
        }
        assert_eq!(edge_set(&reloaded), edge_set(&graph));
    }

    #[test]
    fn test_round_trip_all_variants_and_groups() {
        let mut graph = DialogueGraph::new("test");
        reset_graph(&mut graph);
        let dialogue = NodeBuilder::new(&graph).dialogue(None, "Ask", "Open the door?", None, [0.0, 0.0]);
        let dialogue = graph.add_node(dialogue);
        let branch = NodeBuilder::new(&graph).branch(None, [10.0, 0.0]);
        let branch = graph.add_node(branch);
        let value = NodeBuilder::new(&graph).value(None, Some(ValueRef::new("has_key")), [10.0, 50.0]);
        let value = graph.add_node(value);
        let event = NodeBuilder::new(&graph).event(None, Some(ValueRef::new("door_opened")), [20.0, 0.0]);
        let event = graph.add_node(event);
        let end = NodeBuilder::new(&graph).end(None, [30.0, 0.0]);
        let end = graph.add_node(end);

        graph.connect(PortRef::new(NodeId::entry(), PortRole::Start), PortRef::new(&dialogue, PortRole::Input)).unwrap();
        graph.connect(PortRef::new(&dialogue, PortRole::Output), PortRef::new(&branch, PortRole::Input)).unwrap();
        graph.connect(PortRef::new(&value, PortRole::Value), PortRef::new(&branch, PortRole::Predicate)).unwrap();
        graph.connect(PortRef::new(&branch, PortRole::True), PortRef::new(&event, PortRole::Input)).unwrap();
        graph.connect(PortRef::new(&branch, PortRole::False), PortRef::new(&end, PortRole::End)).unwrap();
        graph.connect(PortRef::new(&event, PortRole::Output), PortRef::new(&end, PortRole::End)).unwrap();

        let group = graph.create_comment_block("Door", [0.0, -20.0]);
        graph.add_to_group(group, &branch);
        graph.add_to_group(group, &value);

        let mut container = DialogueContainer::new();
        save_graph(&graph, &mut container);

        // Through text as well, the way documents reach disk
        let container = DialogueContainer::from_ron(&container.to_ron().unwrap()).unwrap();

        let mut reloaded = DialogueGraph::new("test");
        let summary = load_graph(&mut reloaded, &container);
        assert_eq!(summary.dropped_links, 0);

        assert_eq!(reloaded.node_count(), graph.node_count());
        for node in graph.nodes() {
            assert_eq!(reloaded.node(&node.id), Some(node));
        }
        assert_eq!(edge_set(&reloaded), edge_set(&graph));

        let groups: Vec<_> = reloaded.groups().collect();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Door");
        assert!(groups[0].contains(&branch));
        assert!(groups[0].contains(&value));
    }

    #[test]
    fn test_branch_roles_independent_of_record_order() {
        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.links.push(LinkRecord::new("BranchNode- 0", "False", "EndNode- 1"));
        container.links.push(LinkRecord::new("BranchNode- 0", "True", "EndNode- 0"));

        let mut graph = DialogueGraph::new("test");
        load_graph(&mut graph, &container);
        let edges = edge_set(&graph);
        assert!(edges.contains(&(
            PortRef::new("BranchNode- 0", PortRole::True),
            PortRef::new("EndNode- 0", PortRole::End),
        )));
        assert!(edges.contains(&(
            PortRef::new("BranchNode- 0", PortRole::False),
            PortRef::new("EndNode- 1", PortRole::End),
        )));
    }

    #[test]
    fn test_two_true_links_both_use_true_output() {
        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.links.push(LinkRecord::new("BranchNode- 0", "True", "EndNode- 0"));
        container.links.push(LinkRecord::new("BranchNode- 0", "True", "EndNode- 1"));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.links, 2);
        let true_port = PortRef::new("BranchNode- 0", PortRole::True);
        assert_eq!(graph.connections_from(&true_port).count(), 2);

        let mut saved = DialogueContainer::new();
        save_graph(&graph, &mut saved);
        assert_eq!(saved.links, container.links);
    }

    #[test]
    fn test_dangling_link_dropped() {
        let mut container = DialogueContainer::template();
        container.links.push(LinkRecord::new("DialogueNode- 0", "Output", "EndNode- 9"));
        container.links.push(LinkRecord::new("Ghost- 0", "Output", "DialogueNode- 0"));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.links, 1);
        assert_eq!(summary.dropped_links, 2);
        assert_eq!(graph.connection_count(), 1);
    }

    #[test]
    fn test_value_links_target_predicate() {
        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.value_nodes.push(ValueNodeRecord {
            node_id: NodeId::from("ValueNode- 0"),
            position: [0.0, 0.0],
            data: None,
        });
        container.links.push(LinkRecord::new("ValueNode- 0", "Value", "BranchNode- 0"));
        // End nodes have no predicate input
        container.links.push(LinkRecord::new("ValueNode- 0", "Value", "EndNode- 0"));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.links, 1);
        assert!(edge_set(&graph).contains(&(
            PortRef::new("ValueNode- 0", PortRole::Value),
            PortRef::new("BranchNode- 0", PortRole::Predicate),
        )));
    }

    #[test]
    fn test_value_links_from_input_labelled_records() {
        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.value_nodes.push(ValueNodeRecord {
            node_id: NodeId::from("ValueNode- 0"),
            position: [0.0, 0.0],
            data: None,
        });
        container.links.push(LinkRecord::new("ValueNode- 0", "Input", "BranchNode- 0"));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.links, 1);
        assert!(edge_set(&graph).contains(&(
            PortRef::new("ValueNode- 0", PortRole::Value),
            PortRef::new("BranchNode- 0", PortRole::Predicate),
        )));
    }

    #[test]
    fn test_empty_stored_id_kept() {
        let mut container = DialogueContainer::new();
        container.dialogue_nodes.push(DialogueNodeRecord {
            node_id: NodeId::from(""),
            position: [0.0, 0.0],
            title: "Hi".to_string(),
            body: "Hello".to_string(),
            speaker: None,
        });
        container.links.push(LinkRecord::new("Inicio", "Inicio", ""));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.links, 1);
        assert_eq!(summary.dropped_links, 0);
        assert!(graph.contains_node(&NodeId::from("")));
        assert!(!graph.contains_node(&NodeId::from("DialogueNode- 0")));
        assert!(edge_set(&graph).contains(&(
            PortRef::new(NodeId::entry(), PortRole::Start),
            PortRef::new("", PortRole::Input),
        )));
    }

    #[test]
    fn test_end_nodes_never_originate_links() {
        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.links.push(LinkRecord::new("EndNode- 0", "End", "BranchNode- 0"));

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.links, 0);
        assert_eq!(summary.dropped_links, 1);
    }

    #[test]
    fn test_load_replaces_existing_graph() {
        let mut graph = DialogueGraph::new("test");
        load_graph(&mut graph, &DialogueContainer::template());
        let old = graph.create_comment_block("Old", [0.0, 0.0]);

        let mut container = DialogueContainer::new();
        add_branch_fixture(&mut container);
        container.comment_blocks.push(CommentBlockRecord {
            title: "New".to_string(),
            position: [1.0, 1.0],
            member_node_ids: vec![NodeId::from("EndNode- 1"), NodeId::from("Missing- 0")],
        });
        load_graph(&mut graph, &container);

        assert!(!graph.contains_node(&NodeId::from("DialogueNode- 0")));
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.group(old).is_none());
        let block = graph.groups().next().unwrap();
        assert_eq!(block.members.len(), 1);
        assert!(block.contains(&NodeId::from("EndNode- 1")));
    }

    #[test]
    fn test_duplicate_ids_skipped() {
        let mut container = DialogueContainer::template();
        container.end_nodes.push(EndNodeRecord {
            node_id: NodeId::from("DialogueNode- 0"),
            position: [0.0, 0.0],
        });
        container.end_nodes.push(EndNodeRecord {
            node_id: NodeId::entry(),
            position: [0.0, 0.0],
        });

        let mut graph = DialogueGraph::new("test");
        let summary = load_graph(&mut graph, &container);
        assert_eq!(summary.duplicate_nodes, 2);
        assert!(matches!(
            graph.node(&NodeId::from("DialogueNode- 0")).map(|n| &n.variant),
            Some(NodeVariant::Dialogue(_))
        ));
        assert_eq!(graph.nodes().filter(|n| n.entry_point).count(), 1);
    }
}
