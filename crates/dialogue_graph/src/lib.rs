// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue tree graphs and their persistence.
//!
//! This crate holds the editor-independent core of the dialogue editor:
//! - The node model (entry, dialogue, branch, event, end and value nodes)
//! - Identifier allocation for newly placed nodes
//! - A single construction path per node variant
//! - Saving a live graph into a [`DialogueContainer`]
//! - Rebuilding a live graph from a container, re-wiring ports
//!
//! ## Round trips
//!
//! Loading goes through the same [`NodeBuilder`] constructors as
//! interactive placement, so `load(save(g))` reproduces `g` node for node,
//! with duplicate connections collapsed to one.

pub mod assets;
pub mod node;
pub mod port;
pub mod connection;
pub mod group;
pub mod graph;
pub mod ids;
pub mod builder;
pub mod container;
pub mod save;
pub mod load;

pub use assets::{Speaker, SpeakerRef, ValueData, ValueRef};
pub use builder::NodeBuilder;
pub use connection::{Connection, ConnectionId};
pub use container::{ContainerError, ContainerFormat, DialogueContainer, LinkRecord};
pub use graph::{ConnectionError, DialogueGraph, EditError};
pub use group::{CommentBlock, GroupId};
pub use ids::allocate_node_id;
pub use load::{load_graph, reset_graph, LoadSummary};
pub use node::{Node, NodeId, NodeKind, NodeVariant};
pub use port::{Port, PortDirection, PortRef, PortRole, PortType};
pub use save::{save_graph, SaveSummary};
