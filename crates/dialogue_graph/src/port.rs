// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.
//!
//! A port is addressed by its owning node and its [`PortRole`]. Roles are
//! named rather than positional so that a branch's `True` and `False`
//! outputs can never be swapped by reordering a port list.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// How many edges a port accepts at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortCapacity {
    /// At most one edge
    Single,
    /// Any number of edges
    Multi,
}

/// What flows through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Conversation flow between dialogue steps
    Flow,
    /// A value feeding a predicate
    Value,
}

impl PortType {
    /// Get the color for this port type (for UI)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Flow => [255, 255, 255],
            Self::Value => [255, 0, 255],
        }
    }

    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        self == other
    }
}

/// Named role of a port on its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRole {
    /// The entry node's single output
    Start,
    /// Main flow input
    Input,
    /// Main flow output
    Output,
    /// Branch predicate input
    Predicate,
    /// Branch output taken when the predicate holds
    True,
    /// Branch output taken otherwise
    False,
    /// End node input
    End,
    /// Value node output
    Value,
}

impl PortRole {
    /// Label shown on the port and stored in link records
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Inicio",
            Self::Input => "Input",
            Self::Output => "Output",
            Self::Predicate => "Predicate",
            Self::True => "True",
            Self::False => "False",
            Self::End => "End",
            Self::Value => "Value",
        }
    }

    /// Parse a stored label back into a role
    pub fn from_label(label: &str) -> Option<Self> {
        let role = match label {
            "Inicio" => Self::Start,
            "Input" => Self::Input,
            "Output" => Self::Output,
            "Predicate" => Self::Predicate,
            "True" => Self::True,
            "False" => Self::False,
            "End" => Self::End,
            "Value" => Self::Value,
            _ => return None,
        };
        Some(role)
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A port on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Role of the port on its node
    pub role: PortRole,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Edge capacity
    pub capacity: PortCapacity,
}

impl Port {
    /// Create a new input port
    pub fn input(role: PortRole, port_type: PortType, capacity: PortCapacity) -> Self {
        Self {
            role,
            direction: PortDirection::Input,
            port_type,
            capacity,
        }
    }

    /// Create a new output port
    pub fn output(role: PortRole, port_type: PortType, capacity: PortCapacity) -> Self {
        Self {
            role,
            direction: PortDirection::Output,
            port_type,
            capacity,
        }
    }

    /// Whether the port accepts more than one edge
    pub fn is_multi(&self) -> bool {
        self.capacity == PortCapacity::Multi
    }

    /// Check if a connection to another port is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        // Must be opposite directions
        if self.direction == other.direction {
            return false;
        }

        self.port_type.can_connect_to(&other.port_type)
    }
}

/// Address of a port within a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Role on that node
    pub role: PortRole,
}

impl PortRef {
    /// Create a new port reference
    pub fn new(node: impl Into<NodeId>, role: PortRole) -> Self {
        Self {
            node: node.into(),
            role,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels_round_trip() {
        for role in [
            PortRole::Start,
            PortRole::Input,
            PortRole::Output,
            PortRole::Predicate,
            PortRole::True,
            PortRole::False,
            PortRole::End,
            PortRole::Value,
        ] {
            assert_eq!(PortRole::from_label(role.label()), Some(role));
        }
        assert_eq!(PortRole::from_label("Maybe"), None);
    }

    #[test]
    fn test_can_connect() {
        let out = Port::output(PortRole::Output, PortType::Flow, PortCapacity::Multi);
        let input = Port::input(PortRole::Input, PortType::Flow, PortCapacity::Multi);
        let predicate = Port::input(PortRole::Predicate, PortType::Value, PortCapacity::Single);

        assert!(out.can_connect(&input));
        assert!(input.can_connect(&out));
        assert!(!out.can_connect(&out));
        assert!(!out.can_connect(&predicate));
    }
}
