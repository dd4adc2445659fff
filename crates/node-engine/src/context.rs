//! Per-invocation context handed to a node's process function

use graph_flow::Context;

use crate::events::{EventSink, WorkflowEvent};
use crate::plugin::PluginConfig;
use crate::tasks::ContextKeys;
use crate::values::Outputs;

/// What a running node may ask of its host
///
/// Built fresh for each invocation; nothing in here is shared between runs
/// except the borrowed configuration and sink.
pub struct ProcessContext<'a> {
    task_id: &'a str,
    execution_id: &'a str,
    plugin_id: &'a str,
    config: &'a PluginConfig,
    events: Option<&'a dyn EventSink>,
    graph: Option<&'a Context>,
}

impl<'a> ProcessContext<'a> {
    pub fn new(
        task_id: &'a str,
        execution_id: &'a str,
        plugin_id: &'a str,
        config: &'a PluginConfig,
    ) -> Self {
        Self {
            task_id,
            execution_id,
            plugin_id,
            config,
            events: None,
            graph: None,
        }
    }

    /// Deliver partial outputs to `sink`
    pub fn with_events(mut self, sink: &'a dyn EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Also publish partial outputs under `{task_id}.stream.{port}` in `context`
    pub fn with_graph_context(mut self, context: &'a Context) -> Self {
        self.graph = Some(context);
        self
    }

    pub fn task_id(&self) -> &str {
        self.task_id
    }

    pub fn execution_id(&self) -> &str {
        self.execution_id
    }

    /// Read a configuration value of the owning plugin
    pub fn plugin_config(&self, key: &str) -> Option<String> {
        self.config.get(self.plugin_id, key)
    }

    /// Whether anyone is listening for partial outputs
    pub fn has_partial_output_listener(&self) -> bool {
        self.events.is_some() || self.graph.is_some()
    }

    /// Report outputs computed so far.
    ///
    /// Each port is written to its stream key in the graph context and sent
    /// as one stream event. Event delivery failures are logged and otherwise
    /// ignored; they never fail the node.
    pub async fn on_partial_outputs(&self, outputs: &Outputs) {
        for (port, value) in outputs {
            let data = value.to_json();

            if let Some(context) = self.graph {
                context
                    .set(ContextKeys::stream(self.task_id, port), data.clone())
                    .await;
            }

            if let Some(sink) = self.events {
                let event = WorkflowEvent::task_stream(self.task_id, self.execution_id, port, data);
                if let Err(e) = sink.send(event) {
                    log::warn!(
                        "Task {}: dropped partial output on '{}': {}",
                        self.task_id,
                        port,
                        e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecEventSink;
    use crate::values::DataValue;

    #[tokio::test]
    async fn test_partial_outputs_become_stream_events() {
        let config = PluginConfig::new();
        let sink = VecEventSink::new();
        let ctx = ProcessContext::new("chat-1", "exec-1", "test", &config).with_events(&sink);

        let mut outputs = Outputs::new();
        outputs.insert("output".to_string(), DataValue::from("Hel"));
        ctx.on_partial_outputs(&outputs).await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            WorkflowEvent::TaskStream { port, data, execution_id, .. } => {
                assert_eq!(port, "output");
                assert_eq!(execution_id, "exec-1");
                assert_eq!(data["value"], "Hel");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_listener_is_silent() {
        let config = PluginConfig::new();
        let ctx = ProcessContext::new("chat-1", "exec-1", "test", &config);
        assert!(!ctx.has_partial_output_listener());
        ctx.on_partial_outputs(&Outputs::new()).await;
    }

    #[tokio::test]
    async fn test_partial_outputs_written_to_stream_key() {
        let config = PluginConfig::new();
        let context = Context::new();
        let ctx =
            ProcessContext::new("chat-1", "exec-1", "test", &config).with_graph_context(&context);
        assert!(ctx.has_partial_output_listener());

        let mut outputs = Outputs::new();
        outputs.insert("output".to_string(), DataValue::from("Hel"));
        ctx.on_partial_outputs(&outputs).await;

        outputs.insert("output".to_string(), DataValue::from("Hello"));
        ctx.on_partial_outputs(&outputs).await;

        let stored: Option<serde_json::Value> = context.get("chat-1.stream.output").await;
        assert_eq!(stored, Some(serde_json::json!({"type": "string", "value": "Hello"})));
    }

    #[test]
    fn test_plugin_config_is_scoped() {
        let mut config = PluginConfig::new();
        config.set("test", "key", "mine");
        config.set("other", "key", "theirs");

        let ctx = ProcessContext::new("t", "e", "test", &config);
        assert_eq!(ctx.plugin_config("key").as_deref(), Some("mine"));
    }
}
