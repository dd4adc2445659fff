//! Context key conventions for graph-flow tasks
//!
//! Tasks communicate via the shared graph-flow `Context`, storing inputs
//! and outputs with well-defined key patterns.
//!
//! # Key Conventions
//!
//! - Inputs: `{task_id}.input.{port_name}`
//! - Outputs: `{task_id}.output.{port_name}`
//! - Streaming: `{task_id}.stream.{port_name}`
//! - Node data and other metadata: `{task_id}.meta.{field}`
//!
//! # Example
//!
//! ```ignore
//! // Set input for a chat task
//! context.set("chat_1.input.prompt", "Hello, world!").await;
//!
//! // After execution, get output
//! let response: Option<serde_json::Value> = context.get("chat_1.output.output").await;
//! ```

/// Helper for building context keys
pub struct ContextKeys;

impl ContextKeys {
    /// Build an input key: `{task_id}.input.{port}`
    pub fn input(task_id: &str, port: &str) -> String {
        format!("{}.input.{}", task_id, port)
    }

    /// Build an output key: `{task_id}.output.{port}`
    pub fn output(task_id: &str, port: &str) -> String {
        format!("{}.output.{}", task_id, port)
    }

    /// Build a stream key: `{task_id}.stream.{port}`
    pub fn stream(task_id: &str, port: &str) -> String {
        format!("{}.stream.{}", task_id, port)
    }

    /// Build a metadata key: `{task_id}.meta.{field}`
    pub fn meta(task_id: &str, field: &str) -> String {
        format!("{}.meta.{}", task_id, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keys() {
        assert_eq!(ContextKeys::input("task1", "prompt"), "task1.input.prompt");
        assert_eq!(ContextKeys::output("task1", "output"), "task1.output.output");
        assert_eq!(ContextKeys::stream("task1", "output"), "task1.stream.output");
        assert_eq!(ContextKeys::meta("task1", "data"), "task1.meta.data");
    }
}
