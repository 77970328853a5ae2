// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dialogue Editor - document session layer
//!
//! Wraps a [`dialogue_graph::DialogueGraph`] in an [`EditorSession`] that
//! knows which document is open and how to reach it on disk:
//! - Document store for RON/JSON dialogue containers
//! - Editor settings (last open document, autosave default)
//! - Tick-driven autosave plus focus-loss, window-close and shutdown saves
//! - User notices through a host-supplied [`Notifier`]
//!
//! The host owns the session and drives it from its UI thread.

pub mod autosave;
pub mod logging;
pub mod notify;
pub mod session;
pub mod settings;
pub mod store;

pub use autosave::AutoSave;
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{EditorSession, SessionError};
pub use settings::{
    EditorSettings, FileSettingsStore, MemorySettingsStore, SettingsError, SettingsStore,
};
pub use store::{DocumentError, DocumentRef, DocumentStore};
