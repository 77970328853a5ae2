// SPDX-License-Identifier: MIT OR Apache-2.0
//! The persisted dialogue document.
//!
//! A container is a flat set of per-variant node records, link records and
//! comment block records. Saving always clears and repopulates every list;
//! nothing is merged. The entry node is implicit and never stored.

use crate::assets::{SpeakerRef, ValueRef};
use crate::builder::DEFAULT_DIALOGUE_TEXT;
use crate::ids::format_node_id;
use crate::node::{NodeId, NodeKind};
use crate::port::PortRole;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current container format version
pub const CONTAINER_FORMAT_VERSION: u32 = 1;

/// Where the template's first dialogue node sits
const TEMPLATE_DIALOGUE_POSITION: [f32; 2] = [212.0, 200.0];

/// Stored dialogue node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueNodeRecord {
    /// Node identifier
    pub node_id: NodeId,
    /// Canvas position
    pub position: [f32; 2],
    /// Option title
    pub title: String,
    /// Body text
    pub body: String,
    /// Speaker reference
    #[serde(default)]
    pub speaker: Option<SpeakerRef>,
}

/// Stored end node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndNodeRecord {
    /// Node identifier
    pub node_id: NodeId,
    /// Canvas position
    pub position: [f32; 2],
}

/// Stored branch node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchNodeRecord {
    /// Node identifier
    pub node_id: NodeId,
    /// Canvas position
    pub position: [f32; 2],
}

/// Stored event node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNodeRecord {
    /// Node identifier
    pub node_id: NodeId,
    /// Canvas position
    pub position: [f32; 2],
    /// Value raised by the event
    #[serde(default)]
    pub data: Option<ValueRef>,
}

/// Stored value node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueNodeRecord {
    /// Node identifier
    pub node_id: NodeId,
    /// Canvas position
    pub position: [f32; 2],
    /// Value fed to consumers
    #[serde(default)]
    pub data: Option<ValueRef>,
}

/// Stored connection, keyed by its source port's role label.
///
/// Value nodes write `Value` as their role label. Older documents may carry
/// `Input` there instead; the loader ignores the label for value sources,
/// so both read the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Node the link leaves from
    pub source_id: NodeId,
    /// Label of the output port it leaves from
    pub source_port_role: String,
    /// Node the link arrives at
    pub target_id: NodeId,
}

impl LinkRecord {
    /// Create a link record
    pub fn new(source_id: impl Into<NodeId>, source_port_role: impl Into<String>, target_id: impl Into<NodeId>) -> Self {
        Self {
            source_id: source_id.into(),
            source_port_role: source_port_role.into(),
            target_id: target_id.into(),
        }
    }
}

/// Stored comment block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBlockRecord {
    /// Header title
    pub title: String,
    /// Top-left position
    pub position: [f32; 2],
    /// Nodes inside the block
    #[serde(default)]
    pub member_node_ids: Vec<NodeId>,
}

/// Text encoding of a container file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFormat {
    /// Rusty Object Notation
    #[default]
    Ron,
    /// JSON
    Json,
}

impl ContainerFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ron => "ron",
            Self::Json => "json",
        }
    }

    /// Pick the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ron" => Some(Self::Ron),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Pick the format from a path, if its extension is known
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// The persisted dialogue document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueContainer {
    /// Format version
    #[serde(default = "current_version")]
    pub version: u32,
    /// Links between nodes
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    /// Dialogue nodes
    #[serde(default)]
    pub dialogue_nodes: Vec<DialogueNodeRecord>,
    /// End nodes
    #[serde(default)]
    pub end_nodes: Vec<EndNodeRecord>,
    /// Branch nodes
    #[serde(default)]
    pub branch_nodes: Vec<BranchNodeRecord>,
    /// Event nodes
    #[serde(default)]
    pub event_nodes: Vec<EventNodeRecord>,
    /// Value nodes
    #[serde(default)]
    pub value_nodes: Vec<ValueNodeRecord>,
    /// Comment blocks
    #[serde(default)]
    pub comment_blocks: Vec<CommentBlockRecord>,
    /// Whether the in-memory copy differs from disk
    #[serde(skip)]
    dirty: bool,
}

fn current_version() -> u32 {
    CONTAINER_FORMAT_VERSION
}

impl DialogueContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            version: CONTAINER_FORMAT_VERSION,
            links: Vec::new(),
            dialogue_nodes: Vec::new(),
            end_nodes: Vec::new(),
            branch_nodes: Vec::new(),
            event_nodes: Vec::new(),
            value_nodes: Vec::new(),
            comment_blocks: Vec::new(),
            dirty: false,
        }
    }

    /// The starter document: the entry node wired to one dialogue line
    pub fn template() -> Self {
        let first = format_node_id(NodeKind::Dialogue, 0);
        let mut container = Self::new();
        container
            .links
            .push(LinkRecord::new(NodeId::entry(), PortRole::Start.label(), first.clone()));
        container.dialogue_nodes.push(DialogueNodeRecord {
            node_id: first,
            position: TEMPLATE_DIALOGUE_POSITION,
            title: NodeKind::Dialogue.default_title().to_string(),
            body: DEFAULT_DIALOGUE_TEXT.to_string(),
            speaker: None,
        });
        container.dirty = true;
        container
    }

    /// Empty every list
    pub fn clear_lists(&mut self) {
        self.links.clear();
        self.dialogue_nodes.clear();
        self.end_nodes.clear();
        self.branch_nodes.clear();
        self.value_nodes.clear();
        self.event_nodes.clear();
        self.comment_blocks.clear();
    }

    /// Number of stored nodes across all variants
    pub fn node_count(&self) -> usize {
        self.dialogue_nodes.len()
            + self.end_nodes.len()
            + self.branch_nodes.len()
            + self.event_nodes.len()
            + self.value_nodes.len()
    }

    /// Whether no nodes, links or comment blocks are stored
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0 && self.links.is_empty() && self.comment_blocks.is_empty()
    }

    /// Flag the container as needing a write
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Flag the container as written
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Whether the container needs a write
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ContainerError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON
    pub fn from_ron(text: &str) -> Result<Self, ContainerError> {
        let container: Self = ron::from_str(text)?;
        container.check_version()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ContainerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(text: &str) -> Result<Self, ContainerError> {
        let container: Self = serde_json::from_str(text)?;
        container.check_version()
    }

    /// Serialize in the given format
    pub fn encode(&self, format: ContainerFormat) -> Result<String, ContainerError> {
        match format {
            ContainerFormat::Ron => self.to_ron(),
            ContainerFormat::Json => self.to_json(),
        }
    }

    /// Deserialize from the given format
    pub fn decode(text: &str, format: ContainerFormat) -> Result<Self, ContainerError> {
        match format {
            ContainerFormat::Ron => Self::from_ron(text),
            ContainerFormat::Json => Self::from_json(text),
        }
    }

    fn check_version(self) -> Result<Self, ContainerError> {
        if self.version > CONTAINER_FORMAT_VERSION {
            return Err(ContainerError::UnsupportedVersion {
                found: self.version,
                supported: CONTAINER_FORMAT_VERSION,
            });
        }
        Ok(self)
    }
}

impl Default for DialogueContainer {
    fn default() -> Self {
        Self::new()
    }
}

/// Error encoding or decoding a container
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// RON serialization failed
    #[error("RON serialization error: {0}")]
    RonEncode(#[from] ron::Error),

    /// RON parsing failed
    #[error("RON parse error: {0}")]
    RonDecode(#[from] ron::error::SpannedError),

    /// JSON encoding or parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Written by a newer version of the editor
    #[error("Container version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}
