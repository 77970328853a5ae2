// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runtime assets referenced from dialogue nodes.
//!
//! Nodes never embed these; they hold a [`SpeakerRef`] or [`ValueRef`] key
//! that the host resolves against its own asset database, for example
//! with [`SpeakerRef::resolve`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A character who speaks dialogue lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    /// Display name
    pub name: String,
    /// Portrait image path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<PathBuf>,
}

/// A named boolean consumed by branch predicates and raised by events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueData {
    /// Stable identifier used by gameplay code
    pub uid: String,
    /// Current value
    pub value: bool,
}

/// Reference to a [`Speaker`] asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerRef(pub String);

/// Reference to a [`ValueData`] asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueRef(pub String);

impl SpeakerRef {
    /// Create a new speaker reference
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Look up the speaker by name
    pub fn resolve<'a>(&self, speakers: &'a [Speaker]) -> Option<&'a Speaker> {
        speakers.iter().find(|s| s.name == self.0)
    }
}

impl From<&Speaker> for SpeakerRef {
    fn from(speaker: &Speaker) -> Self {
        Self(speaker.name.clone())
    }
}

impl ValueRef {
    /// Create a new value reference
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Look up the value by uid
    pub fn resolve<'a>(&self, values: &'a [ValueData]) -> Option<&'a ValueData> {
        values.iter().find(|v| v.uid == self.0)
    }
}

impl From<&ValueData> for ValueRef {
    fn from(value: &ValueData) -> Self {
        Self(value.uid.clone())
    }
}

impl fmt::Display for SpeakerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeBuilder;
    use crate::graph::DialogueGraph;
    use crate::node::NodeVariant;

    fn speakers() -> Vec<Speaker> {
        vec![
            Speaker {
                name: "Ana".to_string(),
                portrait: Some(PathBuf::from("portraits/ana.png")),
            },
            Speaker {
                name: "Bo".to_string(),
                portrait: None,
            },
        ]
    }

    #[test]
    fn test_resolve_speaker_from_node() {
        let speakers = speakers();
        let graph = DialogueGraph::new("test");
        let node = NodeBuilder::new(&graph).dialogue(
            None,
            "Hi",
            "Hello",
            Some(SpeakerRef::from(&speakers[1])),
            [0.0, 0.0],
        );

        let NodeVariant::Dialogue(dialogue) = &node.variant else {
            panic!("expected a dialogue node");
        };
        let speaker = dialogue.speaker.as_ref().and_then(|r| r.resolve(&speakers));
        assert_eq!(speaker.map(|s| s.name.as_str()), Some("Bo"));
        assert!(SpeakerRef::new("Cy").resolve(&speakers).is_none());
    }

    #[test]
    fn test_resolve_value() {
        let values = vec![
            ValueData {
                uid: "met_ana".to_string(),
                value: true,
            },
            ValueData {
                uid: "has_key".to_string(),
                value: false,
            },
        ];

        let key = ValueRef::from(&values[1]);
        assert_eq!(key.to_string(), "has_key");
        assert_eq!(key.resolve(&values), Some(&values[1]));
        assert!(ValueRef::new("missing").resolve(&values).is_none());
    }

    #[test]
    fn test_speaker_portrait_omitted_when_absent() {
        let text = ron::to_string(&speakers()[1]).unwrap();
        assert!(!text.contains("portrait"));
        let back: Speaker = ron::from_str(&text).unwrap();
        assert_eq!(back, speakers()[1]);
    }
}
