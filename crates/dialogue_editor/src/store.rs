// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue container assets on disk.
//!
//! A [`DocumentStore`] is rooted at an asset directory. Documents are
//! addressed by a [`DocumentRef`] holding a display name and a path relative
//! to that root; the path's extension picks the text encoding.

use dialogue_graph::{ContainerError, ContainerFormat, DialogueContainer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base name for containers created from the template
pub const NEW_CONTAINER_NAME: &str = "Container";

/// Document store errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failed
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// Extension is neither `.ron` nor `.json`
    #[error("Unknown container format: {0:?}")]
    UnknownFormat(PathBuf),
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Handle to a dialogue document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Display name; an empty name marks an unidentified document
    pub name: String,
    /// Path relative to the store root
    pub path: PathBuf,
}

impl DocumentRef {
    /// Create a document reference
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Reference a file, naming it after its stem
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Whether the document has a usable name
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Reads and writes containers under an asset directory
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    format: ContainerFormat,
}

impl DocumentStore {
    /// Create a store rooted at `root`, writing new documents as RON
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            format: ContainerFormat::default(),
        }
    }

    /// Use `format` for documents created by this store
    pub fn with_format(mut self, format: ContainerFormat) -> Self {
        self.format = format;
        self
    }

    /// Asset directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a document
    pub fn resolve(&self, doc: &DocumentRef) -> PathBuf {
        self.root.join(&doc.path)
    }

    /// Reference for a document called `name` in the store's format
    pub fn document(&self, name: &str) -> DocumentRef {
        DocumentRef::new(name, format!("{name}.{}", self.format.extension()))
    }

    /// Whether the document's file exists
    pub fn exists(&self, doc: &DocumentRef) -> bool {
        self.resolve(doc).is_file()
    }

    fn format_of(&self, doc: &DocumentRef) -> Result<ContainerFormat> {
        ContainerFormat::from_path(&doc.path).ok_or_else(|| DocumentError::UnknownFormat(doc.path.clone()))
    }

    /// Read a container
    pub fn load(&self, doc: &DocumentRef) -> Result<DialogueContainer> {
        let format = self.format_of(doc)?;
        let content = std::fs::read_to_string(self.resolve(doc))?;
        Ok(DialogueContainer::decode(&content, format)?)
    }

    /// Write a container if it is dirty; returns whether anything was written
    pub fn save(&self, doc: &DocumentRef, container: &mut DialogueContainer) -> Result<bool> {
        if !container.is_dirty() {
            return Ok(false);
        }

        let format = self.format_of(doc)?;
        let path = self.resolve(doc);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, container.encode(format)?)?;
        container.mark_clean();

        tracing::debug!("Wrote {:?}", path);
        Ok(true)
    }

    /// Write a new starter document under the first free `Container` name
    pub fn create_container(&self) -> Result<DocumentRef> {
        let mut doc = self.document(NEW_CONTAINER_NAME);
        let mut i = 0;
        while self.exists(&doc) {
            i += 1;
            doc = self.document(&format!("{NEW_CONTAINER_NAME} {i}"));
        }

        let mut container = DialogueContainer::template();
        self.save(&doc, &mut container)?;

        tracing::info!("Created dialogue container: {}", doc.name);
        Ok(doc)
    }
}
