// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless dialogue editor host.
//!
//! Usage: `dialogue_editor [ASSET_DIR] [DOCUMENT]`
//!
//! Opens `DOCUMENT` (a path relative to `ASSET_DIR`), or the last open
//! document recorded in the settings, or a fresh starter container, and
//! saves it back on exit.

use dialogue_editor::{DocumentRef, DocumentStore, EditorSession, FileSettingsStore, TracingNotifier};
use std::path::PathBuf;

fn main() {
    dialogue_editor::logging::init();

    let mut args = std::env::args().skip(1);
    let root = args.next().map_or_else(|| PathBuf::from("."), PathBuf::from);
    let requested = args.next().map(DocumentRef::from_path);

    tracing::info!("Starting dialogue editor v{} in {:?}", env!("CARGO_PKG_VERSION"), root);

    let store = DocumentStore::new(&root);
    let settings = FileSettingsStore::open(&root);
    let mut session = EditorSession::new(store, settings, TracingNotifier);

    let opened = match session.open_or_create(requested) {
        Ok(opened) => opened,
        Err(e) => {
            tracing::error!("Failed to open dialogue document: {e}");
            false
        }
    };

    if !opened {
        std::process::exit(1);
    }

    let graph = session.graph();
    tracing::info!(
        "{}: {} nodes, {} connections, {} comment blocks",
        graph.name,
        graph.node_count(),
        graph.connection_count(),
        graph.group_count()
    );

    session.on_shutdown();
}
