//! Core types for workflow nodes
//!
//! These types define node instances, ports, and their metadata.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for a port
pub type PortId = String;

/// The data type of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDataType {
    /// Text string
    String,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
}

impl PortDataType {
    /// Name used in error messages and serialized descriptors
    pub fn as_str(&self) -> &'static str {
        match self {
            PortDataType::String => "string",
            PortDataType::Number => "number",
            PortDataType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for PortDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Input nodes (user input, file input, etc.)
    Input,
    /// Output nodes (display, export, etc.)
    Output,
    /// Processing nodes (LLM, embedding, etc.)
    Processing,
    /// Control flow nodes (conditionals, loops, etc.)
    Control,
}

/// Execution mode for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Execute once when inputs are available
    Batch,
    /// Execute with streaming output
    Stream,
    /// Execute reactively when inputs change
    Reactive,
}

/// Placement of a node on the editor canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualData {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// A node instance as stored in the graph document
///
/// `D` is the node type's own data record. The host owns persistence;
/// this type only has to round-trip through serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance<D> {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Node type (references a registered descriptor)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display title
    pub title: String,
    /// Node-specific configuration
    pub data: D,
    /// Position and size in the editor
    pub visual_data: VisualData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_data_type_names() {
        assert_eq!(PortDataType::Number.to_string(), "number");
        assert_eq!(
            serde_json::to_value(PortDataType::Boolean).unwrap(),
            serde_json::json!("boolean")
        );
    }

    #[test]
    fn test_node_instance_serialization() {
        let node = NodeInstance {
            id: "n1".to_string(),
            node_type: "echo".to_string(),
            title: "Echo".to_string(),
            data: serde_json::json!({"text": "hi"}),
            visual_data: VisualData {
                x: 0.0,
                y: 0.0,
                width: Some(300.0),
            },
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "echo");
        assert_eq!(json["visualData"]["width"], 300.0);
    }
}
