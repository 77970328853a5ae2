// SPDX-License-Identifier: MIT OR Apache-2.0
//! User-facing notices.

/// Title of the notice shown when a document cannot be found
pub const FILE_NOT_FOUND_TITLE: &str = "File not found";

/// Body of the notice shown when a document cannot be found
pub const FILE_NOT_FOUND_MESSAGE: &str = "The file you are looking for does not exist";

/// Shows a blocking informational dialog. Fire and forget.
pub trait Notifier {
    /// Show a notice
    fn notify(&mut self, title: &str, message: &str);
}

/// Reports notices through `tracing` (headless hosts)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        tracing::warn!("{title}: {message}");
    }
}

/// A notice kept by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub message: String,
}

/// Keeps every notice for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    /// Notices in the order they were raised
    pub notices: Vec<Notice>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        self.notices.push(Notice {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}
