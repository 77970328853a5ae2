// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph to container serialization.

use crate::container::{
    BranchNodeRecord, CommentBlockRecord, DialogueContainer, DialogueNodeRecord, EndNodeRecord,
    EventNodeRecord, LinkRecord, ValueNodeRecord,
};
use crate::graph::DialogueGraph;
use crate::node::NodeVariant;
use indexmap::IndexSet;

/// Counts from one save, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    /// Node records written
    pub nodes: usize,
    /// Link records written after deduplication
    pub links: usize,
    /// Duplicate links collapsed
    pub duplicate_links: usize,
    /// In-flight or dangling connections skipped
    pub skipped_connections: usize,
    /// Comment block records written
    pub comment_blocks: usize,
}

/// Flatten the live graph into `container`, replacing its content.
///
/// The container is marked dirty; writing it out is up to the caller.
pub fn save_graph(graph: &DialogueGraph, container: &mut DialogueContainer) -> SaveSummary {
    let mut summary = SaveSummary::default();
    container.clear_lists();

    let links = collect_links(graph, &mut summary);
    summary.links = links.len();
    container.links = links.into_iter().collect();

    for node in graph.nodes().filter(|n| !n.entry_point) {
        let node_id = node.id.clone();
        let position = node.position;
        match &node.variant {
            NodeVariant::Dialogue(dialogue) => container.dialogue_nodes.push(DialogueNodeRecord {
                node_id,
                position,
                title: dialogue.title.clone(),
                body: dialogue.body.clone(),
                speaker: dialogue.speaker.clone(),
            }),
            NodeVariant::End(_) => container.end_nodes.push(EndNodeRecord { node_id, position }),
            NodeVariant::Branch(_) => container.branch_nodes.push(BranchNodeRecord { node_id, position }),
            NodeVariant::Event(event) => container.event_nodes.push(EventNodeRecord {
                node_id,
                position,
                data: event.data.clone(),
            }),
            NodeVariant::Value(value) => container.value_nodes.push(ValueNodeRecord {
                node_id,
                position,
                data: value.data.clone(),
            }),
            // The entry node is rebuilt on load, never stored
            NodeVariant::Entry(_) => continue,
        }
        summary.nodes += 1;
    }

    for group in graph.groups() {
        container.comment_blocks.push(CommentBlockRecord {
            title: group.title.clone(),
            position: group.position,
            member_node_ids: group
                .members
                .iter()
                .filter(|id| graph.contains_node(id))
                .cloned()
                .collect(),
        });
    }
    summary.comment_blocks = container.comment_blocks.len();

    container.mark_dirty();
    tracing::debug!(
        nodes = summary.nodes,
        links = summary.links,
        duplicates = summary.duplicate_links,
        skipped = summary.skipped_connections,
        "Serialized graph {}",
        graph.name
    );
    summary
}

/// One record per distinct (source, port role, target) triple, in first-seen order
fn collect_links(graph: &DialogueGraph, summary: &mut SaveSummary) -> IndexSet<LinkRecord> {
    let mut links = IndexSet::new();

    for connection in graph.connections() {
        let (Some(output), Some(input)) = (&connection.output, &connection.input) else {
            summary.skipped_connections += 1;
            continue;
        };
        if !graph.contains_node(&input.node) || !graph.contains_node(&output.node) {
            summary.skipped_connections += 1;
            continue;
        }

        let record = LinkRecord::new(&output.node, output.role.label(), &input.node);
        if !links.insert(record) {
            summary.duplicate_links += 1;
        }
    }

    links
}
