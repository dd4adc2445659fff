//! Node type registry for dynamic node resolution
//!
//! This module provides a registry that maps node type strings to executors
//! and metadata, plus the configuration surface of installed plugins.
//!
//! # Usage
//!
//! ```ignore
//! use node_engine::{NodeRegistry, RegistryTaskExecutor};
//!
//! let mut registry = NodeRegistry::new();
//! registry.install_plugin(&MyPlugin);
//!
//! let task_executor = RegistryTaskExecutor::new(Arc::new(registry));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use graph_flow::Context;

use crate::descriptor::{DescriptorFn, TaskMetadata};
use crate::error::{NodeEngineError, Result};
use crate::events::{EventSink, WorkflowEvent};
use crate::extensions::{extension_keys, ExecutorExtensions};
use crate::plugin::{ContextMenuGroup, Plugin, PluginConfigSpec};

/// Per-node-type executor
///
/// A `NodeExecutor` handles exactly one node type. Inputs arrive as JSON
/// keyed by port id; the node's own data is passed under `_data`.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    /// Execute this node type with the given inputs
    async fn execute(
        &self,
        task_id: &str,
        inputs: HashMap<String, serde_json::Value>,
        context: &Context,
        extensions: &ExecutorExtensions,
    ) -> Result<HashMap<String, serde_json::Value>>;
}

/// Factory for creating or returning a shared NodeExecutor
pub trait NodeExecutorFactory: Send + Sync {
    fn create_executor(&self) -> Arc<dyn NodeExecutor>;
}

/// A registration entry combining metadata with an optional executor factory
struct RegistryEntry {
    metadata: TaskMetadata,
    factory: Option<Arc<dyn NodeExecutorFactory>>,
}

/// Registry of node types with their metadata and executors
///
/// This is the central registry that maps node_type strings to:
/// 1. Metadata (ports, category, label) from TaskDescriptor
/// 2. Executor factories that create per-node executors
///
/// It also records what installed plugins declared: configuration entries
/// and context menu groups.
pub struct NodeRegistry {
    entries: HashMap<String, RegistryEntry>,
    config_specs: Vec<(String, Vec<(String, PluginConfigSpec)>)>,
    context_menu_groups: Vec<ContextMenuGroup>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            config_specs: Vec::new(),
            context_menu_groups: Vec::new(),
        }
    }

    /// Create a registry holding every descriptor submitted via `inventory`
    ///
    /// Entries are metadata-only; executors come from plugin installation.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in inventory::iter::<DescriptorFn> {
            registry.register_metadata((descriptor.0)());
        }
        registry
    }

    /// Register a node type with metadata and an executor factory
    pub fn register(&mut self, metadata: TaskMetadata, factory: Arc<dyn NodeExecutorFactory>) {
        self.entries.insert(
            metadata.node_type.clone(),
            RegistryEntry {
                metadata,
                factory: Some(factory),
            },
        );
    }

    /// Register a node type with a shared executor instance
    pub fn register_executor(&mut self, metadata: TaskMetadata, executor: Arc<dyn NodeExecutor>) {
        self.register(metadata, Arc::new(SharedExecutorFactory { executor }));
    }

    /// Register a node type with metadata only (no executor)
    ///
    /// Used for metadata-only registrations (e.g., UI palette listing).
    pub fn register_metadata(&mut self, metadata: TaskMetadata) {
        self.entries.insert(
            metadata.node_type.clone(),
            RegistryEntry {
                metadata,
                factory: None,
            },
        );
    }

    /// Install a plugin: record its config spec and menu groups, then let it
    /// register its node types.
    pub fn install_plugin(&mut self, plugin: &dyn Plugin) {
        let specs = plugin.config_spec();
        if !specs.is_empty() {
            self.config_specs.retain(|(id, _)| id != plugin.id());
            self.config_specs.push((plugin.id().to_string(), specs));
        }

        for group in plugin.context_menu_groups() {
            if !self.context_menu_groups.iter().any(|g| g.id == group.id) {
                self.context_menu_groups.push(group);
            }
        }

        plugin.register(self);

        log::info!("Installed plugin '{}' ({})", plugin.name(), plugin.id());
    }

    /// Config specs of installed plugins, keyed by plugin id
    pub fn plugin_config_specs(
        &self,
    ) -> impl Iterator<Item = (&str, &[(String, PluginConfigSpec)])> {
        self.config_specs
            .iter()
            .map(|(id, specs)| (id.as_str(), specs.as_slice()))
    }

    /// Context menu groups of installed plugins, in installation order
    pub fn context_menu_groups(&self) -> &[ContextMenuGroup] {
        &self.context_menu_groups
    }

    /// Get metadata for a node type
    pub fn get_metadata(&self, node_type: &str) -> Option<&TaskMetadata> {
        self.entries.get(node_type).map(|e| &e.metadata)
    }

    /// Get the executor for a node type
    pub fn get_executor(&self, node_type: &str) -> Option<Arc<dyn NodeExecutor>> {
        self.entries
            .get(node_type)
            .and_then(|e| e.factory.as_ref())
            .map(|f| f.create_executor())
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Factory that returns a shared executor instance
struct SharedExecutorFactory {
    executor: Arc<dyn NodeExecutor>,
}

impl NodeExecutorFactory for SharedExecutorFactory {
    fn create_executor(&self) -> Arc<dyn NodeExecutor> {
        self.executor.clone()
    }
}

/// Extract the node type from task inputs or infer it from the task ID.
///
/// Checks `_data.node_type` first, then falls back to stripping the
/// trailing `-N` suffix from the task ID.
pub fn resolve_node_type(task_id: &str, inputs: &HashMap<String, serde_json::Value>) -> String {
    inputs
        .get("_data")
        .and_then(|d| d.get("node_type"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| match task_id.rsplit_once('-') {
            Some((prefix, _)) => prefix.to_string(),
            None => task_id.to_string(),
        })
}

/// Dispatches task execution to the executor registered for its node type
///
/// Lifecycle events (`TaskStarted`, `TaskCompleted`, `TaskFailed`) are
/// reported to the `EventSink` found in the extensions, if any.
pub struct RegistryTaskExecutor {
    registry: Arc<NodeRegistry>,
}

impl RegistryTaskExecutor {
    /// Create a new registry-based task executor
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self { registry }
    }

    /// Execute one task
    pub async fn execute_task(
        &self,
        task_id: &str,
        inputs: HashMap<String, serde_json::Value>,
        context: &Context,
        extensions: &ExecutorExtensions,
    ) -> Result<HashMap<String, serde_json::Value>> {
        let node_type = resolve_node_type(task_id, &inputs);

        let executor = self.registry.get_executor(&node_type).ok_or_else(|| {
            NodeEngineError::ExecutionFailed(format!(
                "No executor registered for node type '{}' (task_id: '{}')",
                node_type, task_id
            ))
        })?;

        let sink = extensions.get::<Arc<dyn EventSink>>(extension_keys::EVENT_SINK);
        let execution_id = extensions
            .get::<String>(extension_keys::EXECUTION_ID)
            .cloned()
            .unwrap_or_default();

        log::debug!("RegistryTaskExecutor: executing '{}' (type '{}')", task_id, node_type);

        emit(
            sink,
            WorkflowEvent::TaskStarted {
                task_id: task_id.to_string(),
                execution_id: execution_id.clone(),
            },
        );

        let result = executor.execute(task_id, inputs, context, extensions).await;

        match &result {
            Ok(outputs) => emit(
                sink,
                WorkflowEvent::TaskCompleted {
                    task_id: task_id.to_string(),
                    execution_id,
                    output: serde_json::to_value(outputs).ok(),
                },
            ),
            Err(e) => emit(
                sink,
                WorkflowEvent::TaskFailed {
                    task_id: task_id.to_string(),
                    execution_id,
                    error: e.to_string(),
                },
            ),
        }

        result
    }
}

fn emit(sink: Option<&Arc<dyn EventSink>>, event: WorkflowEvent) {
    if let Some(sink) = sink {
        if let Err(e) = sink.send(event) {
            log::warn!("RegistryTaskExecutor: failed to send event: {}", e);
        }
    }
}
