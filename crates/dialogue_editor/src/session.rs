// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editing session for one dialogue document.
//!
//! [`EditorSession`] is the context every editor action goes through: the
//! live graph, the open document, the asset store, the host's settings and
//! its notice dialog. Everything runs on the host's UI thread; each
//! operation either completes or returns before touching the graph.

use crate::autosave::AutoSave;
use crate::notify::{Notifier, FILE_NOT_FOUND_MESSAGE, FILE_NOT_FOUND_TITLE};
use crate::settings::{SettingsError, SettingsStore};
use crate::store::{DocumentError, DocumentRef, DocumentStore};
use dialogue_graph::group::DEFAULT_COMMENT_BLOCK_TITLE;
use dialogue_graph::{
    load_graph, reset_graph, save_graph, DialogueContainer, DialogueGraph, GroupId, NodeBuilder,
    NodeId, NodeKind,
};
use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the document failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Writing settings failed
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Editing context for one dialogue document
pub struct EditorSession<S, N> {
    graph: DialogueGraph,
    document: Option<DocumentRef>,
    store: DocumentStore,
    settings: S,
    notifier: N,
    autosave: AutoSave,
}

impl<S: SettingsStore, N: Notifier> EditorSession<S, N> {
    /// Create a session with an empty graph and no open document
    pub fn new(store: DocumentStore, settings: S, notifier: N) -> Self {
        let autosave = AutoSave::new(settings.auto_save_default(), settings.autosave_interval_ticks());
        let mut graph = DialogueGraph::default();
        reset_graph(&mut graph);
        Self {
            graph,
            document: None,
            store,
            settings,
            notifier,
            autosave,
        }
    }

    /// The live graph
    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    /// The live graph, for the editing surface
    pub fn graph_mut(&mut self) -> &mut DialogueGraph {
        &mut self.graph
    }

    /// The open document
    pub fn document(&self) -> Option<&DocumentRef> {
        self.document.as_ref()
    }

    /// The asset store
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The host settings
    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// The host notice dialog
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The autosave timer
    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    /// The autosave timer, for the toolbar toggle
    pub fn autosave_mut(&mut self) -> &mut AutoSave {
        &mut self.autosave
    }

    /// Reopen the document recorded in settings, if any.
    ///
    /// Also applies the autosave default.
    pub fn restore_last_document(&mut self) -> Result<bool> {
        self.autosave.set_enabled(self.settings.auto_save_default());

        match self.settings.last_open_document() {
            Some(doc) => self.request_load(Some(doc)),
            None => {
                tracing::info!("No dialogue document to restore");
                Ok(false)
            }
        }
    }

    /// Open a document picked by the user and remember it for next time
    pub fn open_document(&mut self, doc: DocumentRef) -> Result<bool> {
        self.settings.set_last_open_document(Some(doc.clone()));
        if let Err(e) = self.settings.persist() {
            tracing::warn!("Failed to record last open document: {e}");
        }
        self.request_load(Some(doc))
    }

    /// Startup path for headless hosts.
    ///
    /// Opens `requested`, or else the last open document, or else a new
    /// starter container.
    pub fn open_or_create(&mut self, requested: Option<DocumentRef>) -> Result<bool> {
        let opened = match requested {
            Some(doc) => self.open_document(doc)?,
            None => self.restore_last_document()?,
        };
        if opened {
            return Ok(true);
        }

        let doc = self.store.create_container()?;
        self.open_document(doc)
    }

    /// Save the live graph into the open document.
    ///
    /// Does nothing (and returns `Ok(false)`) when no document is open or the
    /// document is unnamed.
    pub fn request_save(&mut self) -> Result<bool> {
        let Some(doc) = self.document.clone() else {
            return Ok(false);
        };
        if !doc.is_named() {
            return Ok(false);
        }

        self.settings.set_last_open_document(Some(doc.clone()));

        let created = !self.store.exists(&doc);
        let mut container = DialogueContainer::new();
        let summary = save_graph(&self.graph, &mut container);
        self.store.save(&doc, &mut container)?;

        if created {
            tracing::info!("Created dialogue document: {}", doc.name);
        }
        tracing::info!(
            "Saved dialogue document {} ({} nodes, {} links)",
            doc.name,
            summary.nodes,
            summary.links
        );
        Ok(true)
    }

    /// Replace the live graph with a stored document.
    ///
    /// A missing reference or file raises the "file not found" notice and
    /// leaves the graph untouched.
    pub fn request_load(&mut self, doc: Option<DocumentRef>) -> Result<bool> {
        let Some(doc) = doc.filter(|d| self.store.exists(d)) else {
            self.notifier.notify(FILE_NOT_FOUND_TITLE, FILE_NOT_FOUND_MESSAGE);
            return Ok(false);
        };

        let container = self.store.load(&doc)?;
        let summary = load_graph(&mut self.graph, &container);
        self.graph.name = doc.name.clone();
        self.autosave.reset();

        tracing::info!(
            "Opened dialogue document {} ({} nodes, {} links, {} dropped)",
            doc.name,
            summary.nodes,
            summary.links,
            summary.dropped_links
        );
        self.document = Some(doc);
        Ok(true)
    }

    /// Clear the canvas back to a lone entry node
    pub fn clear_graph(&mut self) -> bool {
        if self.document.is_none() {
            self.notifier.notify(FILE_NOT_FOUND_TITLE, FILE_NOT_FOUND_MESSAGE);
            return false;
        }
        reset_graph(&mut self.graph);
        true
    }

    /// Place a node from the creation palette.
    ///
    /// Returns `None` when asked for a second entry node.
    pub fn create_node(&mut self, kind: NodeKind, position: [f32; 2]) -> Option<NodeId> {
        let node = NodeBuilder::new(&self.graph).with_defaults(kind, position)?;
        tracing::debug!("Created {} at {:?}", node.id, position);
        Some(self.graph.add_node(node))
    }

    /// Place an empty comment block from the creation palette
    pub fn create_comment_block(&mut self, position: [f32; 2]) -> GroupId {
        self.graph.create_comment_block(DEFAULT_COMMENT_BLOCK_TITLE, position)
    }

    /// Host frame tick; saves when the autosave interval elapses.
    ///
    /// Skips the save while a wire is being dragged or before the graph has
    /// any connection.
    pub fn tick(&mut self) -> bool {
        if !self.autosave.tick() {
            return false;
        }
        if self.graph.connection_count() == 0 || self.graph.has_connection_in_flight() {
            tracing::trace!("Autosave skipped: graph is mid-edit");
            return false;
        }
        self.save_best_effort("autosave")
    }

    /// The editor window lost focus
    pub fn on_focus_lost(&mut self) -> bool {
        self.final_save("focus lost")
    }

    /// The editor window is closing
    pub fn on_window_closed(&mut self) -> bool {
        self.final_save("window closed")
    }

    /// The host is shutting down
    pub fn on_shutdown(&mut self) -> bool {
        self.final_save("shutdown")
    }

    fn final_save(&mut self, reason: &str) -> bool {
        if self.graph.connection_count() == 0 || self.graph.node_count() == 0 {
            return false;
        }
        self.save_best_effort(reason)
    }

    fn save_best_effort(&mut self, reason: &str) -> bool {
        match self.request_save() {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Save on {reason} failed: {e}");
                false
            }
        }
    }
}
