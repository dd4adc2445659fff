//! Node Engine - node contract for graph workflow plugins
//!
//! This crate holds everything a host and a node plugin have to agree on:
//!
//! - Port, descriptor and editor metadata used to render a node
//! - Tagged data values and the "use input or static data" resolution rule
//! - `EventSink` for partial outputs while a node is still running
//! - `NodeRegistry` mapping node types to metadata and executors
//! - Plugin registration and per-plugin configuration (secrets included)
//!
//! # Example
//!
//! ```ignore
//! use node_engine::{NodeRegistry, PluginConfig};
//!
//! let mut registry = NodeRegistry::new();
//! registry.install_plugin(&MyPlugin);
//!
//! let config = PluginConfig::load(&app_data_dir).await?;
//! ```

pub mod context;
pub mod descriptor;
pub mod editors;
pub mod error;
pub mod events;
pub mod extensions;
pub mod plugin;
pub mod registry;
pub mod tasks;
pub mod types;
pub mod values;

// Re-export key types
pub use context::ProcessContext;
pub use descriptor::{DescriptorFn, NodeUiData, PortMetadata, TaskDescriptor, TaskMetadata};
pub use editors::EditorDefinition;
pub use error::{NodeEngineError, Result};
pub use events::{EventError, EventSink, NullEventSink, VecEventSink, WorkflowEvent};
pub use extensions::{extension_keys, ExecutorExtensions};
pub use plugin::{ContextMenuGroup, Plugin, PluginConfig, PluginConfigSpec, PluginConfigType};
pub use registry::{NodeExecutor, NodeExecutorFactory, NodeRegistry, RegistryTaskExecutor};
pub use tasks::ContextKeys;
pub use types::{
    ExecutionMode, NodeCategory, NodeId, NodeInstance, PortDataType, PortId, VisualData,
};
pub use values::{coerce, get_input_or_data, DataValue, FromDataValue, Inputs, Outputs};

// Re-export graph-flow types that consumers will need
pub use graph_flow::{Context, GraphError, NextAction, Task, TaskResult};
