//! Hugging Face Nodes
//!
//! Node plugin for the workflow engine that streams text from Hugging Face
//! text-generation models.
//!
//! - [`ChatHuggingFaceNode`]: node definition and `process`
//! - [`ChatHuggingFaceExecutor`]: registry executor, dispatched by node type
//! - [`ChatHuggingFaceTask`]: the same node as a graph-flow task
//! - [`HuggingFacePlugin`]: registers the node, its access token setting
//!   and its context menu group

pub mod plugin;
pub mod processing;
pub mod setup;

// Re-export for convenience
pub use plugin::{default_plugin_config, HuggingFacePlugin};
pub use processing::*;
pub use setup::{setup_extensions, setup_extensions_with_clients};

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use node_engine::{
        extension_keys, Context, EventSink, ExecutorExtensions, NodeEngineError, NodeRegistry,
        RegistryTaskExecutor, VecEventSink, WorkflowEvent,
    };

    use super::*;

    #[test]
    fn test_inventory_collects_chat_node() {
        let registry = NodeRegistry::with_builtins();

        assert!(registry.has_node_type("chatHuggingFace"));
        // Descriptor-only entries carry no executor until the plugin is installed
        assert!(registry.get_executor("chatHuggingFace").is_none());
    }

    #[tokio::test]
    async fn test_registry_dispatch_reports_failure() {
        let mut registry = NodeRegistry::with_builtins();
        registry.install_plugin(&HuggingFacePlugin);
        let executor = RegistryTaskExecutor::new(Arc::new(registry));

        let sink = Arc::new(VecEventSink::new());
        let mut extensions = ExecutorExtensions::new();
        setup_extensions(&mut extensions, default_plugin_config());
        extensions.set(extension_keys::EVENT_SINK, sink.clone() as Arc<dyn EventSink>);

        // Node type comes from the task id; the prompt is not connected
        let mut inputs = HashMap::new();
        inputs.insert("_data".to_string(), serde_json::json!({}));

        let err = executor
            .execute_task("chatHuggingFace-3", inputs, &Context::new(), &extensions)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeEngineError::InvalidInputType { .. }));

        let events = sink.events();
        assert!(matches!(events[0], WorkflowEvent::TaskStarted { .. }));
        assert!(matches!(events.last(), Some(WorkflowEvent::TaskFailed { .. })));
    }
}
