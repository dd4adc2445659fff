//! Task descriptor trait and metadata types
//!
//! This module provides the `TaskDescriptor` trait that allows tasks to
//! self-describe their metadata (ports, category, label, etc.).
//!
//! Descriptors are collected at link time through `inventory`, so a node
//! crate only has to `inventory::submit!` its `DescriptorFn` to show up in
//! [`NodeRegistry::with_builtins`](crate::NodeRegistry::with_builtins).

use serde::{Deserialize, Serialize};

use crate::types::{ExecutionMode, NodeCategory, PortDataType};

/// Trait for tasks that can describe their metadata
///
/// Implementing this trait allows a task to provide its metadata
/// for UI rendering and validation without requiring a separate
/// definition in a registry.
///
/// # Example
///
/// ```ignore
/// use node_engine::{TaskDescriptor, TaskMetadata, PortMetadata};
/// use node_engine::{NodeCategory, ExecutionMode, PortDataType};
///
/// impl TaskDescriptor for MyTask {
///     fn descriptor() -> TaskMetadata {
///         TaskMetadata {
///             node_type: "my-task".to_string(),
///             category: NodeCategory::Processing,
///             label: "My Task".to_string(),
///             description: "Does something useful".to_string(),
///             inputs: vec![
///                 PortMetadata::required("input", "Input", PortDataType::String),
///             ],
///             outputs: vec![
///                 PortMetadata::required("output", "Output", PortDataType::String),
///             ],
///             execution_mode: ExecutionMode::Reactive,
///         }
///     }
/// }
/// ```
pub trait TaskDescriptor {
    /// Get the static metadata for this task type
    fn descriptor() -> TaskMetadata
    where
        Self: Sized;
}

/// Link-time registration entry for a task descriptor
pub struct DescriptorFn(pub fn() -> TaskMetadata);

inventory::collect!(DescriptorFn);

/// Complete metadata for a task type
///
/// This describes everything needed to render a node in the UI
/// and validate connections between nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    /// Unique type identifier (e.g., "chatHuggingFace")
    pub node_type: String,
    /// Category for UI grouping
    pub category: NodeCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the task does
    pub description: String,
    /// Input port definitions
    pub inputs: Vec<PortMetadata>,
    /// Output port definitions
    pub outputs: Vec<PortMetadata>,
    /// Execution mode
    pub execution_mode: ExecutionMode,
}

/// Metadata for a port (input or output)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMetadata {
    /// Port identifier (used in context keys and input maps)
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Data type
    pub data_type: PortDataType,
    /// Whether this input is required
    pub required: bool,
}

impl PortMetadata {
    /// Create a new port metadata
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        data_type: PortDataType,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            data_type,
            required,
        }
    }

    /// Create a required port
    pub fn required(
        id: impl Into<String>,
        title: impl Into<String>,
        data_type: PortDataType,
    ) -> Self {
        Self::new(id, title, data_type, true)
    }
}

/// Palette and help metadata for a node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUiData {
    /// Label shown in the "add node" context menu
    pub context_menu_title: String,
    /// Context menu group the node is listed under
    pub group: String,
    /// Title of the help box
    pub info_box_title: String,
    /// Body of the help box
    pub info_box_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_metadata_required() {
        let port = PortMetadata::required("input", "Input", PortDataType::String);
        assert_eq!(port.id, "input");
        assert_eq!(port.title, "Input");
        assert!(port.required);
    }

    #[test]
    fn test_port_metadata_not_required() {
        let port = PortMetadata::new("output", "Output", PortDataType::String, false);
        assert_eq!(port.id, "output");
        assert!(!port.required);
    }

    #[test]
    fn test_task_metadata_serialization() {
        let metadata = TaskMetadata {
            node_type: "test-task".to_string(),
            category: NodeCategory::Processing,
            label: "Test Task".to_string(),
            description: "A test task".to_string(),
            inputs: vec![PortMetadata::required("input", "Input", PortDataType::String)],
            outputs: vec![PortMetadata::required("output", "Output", PortDataType::String)],
            execution_mode: ExecutionMode::Reactive,
        };

        let json = serde_json::to_string(&metadata).unwrap();
        assert!(json.contains("test-task"));
        assert!(json.contains("nodeType")); // camelCase
        assert!(json.contains("dataType"));
    }

    #[test]
    fn test_ui_data_serialization() {
        let ui = NodeUiData {
            context_menu_title: "Echo".to_string(),
            group: "Text".to_string(),
            info_box_title: "Echo Node".to_string(),
            info_box_body: "Repeats its input".to_string(),
        };

        let json = serde_json::to_value(&ui).unwrap();
        assert_eq!(json["contextMenuTitle"], "Echo");
        assert_eq!(json["infoBoxBody"], "Repeats its input");
    }
}
