//! Event types for streaming node progress
//!
//! Events are sent from a running node to the host (or any consumer)
//! to report partial outputs, completion and failure.

use serde::{Deserialize, Serialize};

/// Trait for sending workflow events
///
/// This abstracts over the transport mechanism (UI channel, mpsc, etc.)
/// allowing nodes to be used in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Events emitted during node execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// A task started executing
    #[serde(rename_all = "camelCase")]
    TaskStarted {
        task_id: String,
        execution_id: String,
    },

    /// A task completed successfully
    #[serde(rename_all = "camelCase")]
    TaskCompleted {
        task_id: String,
        execution_id: String,
        output: Option<serde_json::Value>,
    },

    /// A task failed
    #[serde(rename_all = "camelCase")]
    TaskFailed {
        task_id: String,
        execution_id: String,
        error: String,
    },

    /// Partial output from a task that is still running
    #[serde(rename_all = "camelCase")]
    TaskStream {
        task_id: String,
        execution_id: String,
        port: String,
        data: serde_json::Value,
    },
}

impl WorkflowEvent {
    /// Create a task stream event
    pub fn task_stream(
        task_id: &str,
        execution_id: &str,
        port: &str,
        data: serde_json::Value,
    ) -> Self {
        Self::TaskStream {
            task_id: task_id.to_string(),
            execution_id: execution_id.to_string(),
            port: port.to_string(),
            data,
        }
    }
}

/// A no-op event sink that discards all events
///
/// Used when the host did not ask for partial outputs.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: WorkflowEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<WorkflowEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<(), EventError> {
        let mut events = self.events.lock().map_err(|_| EventError {
            message: "Event buffer poisoned".to_string(),
        })?;
        events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();

        sink.send(WorkflowEvent::task_stream(
            "task1",
            "exec1",
            "output",
            serde_json::json!({"type": "string", "value": "Hel"}),
        ))
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);

        match &events[0] {
            WorkflowEvent::TaskStream { task_id, port, .. } => {
                assert_eq!(task_id, "task1");
                assert_eq!(port, "output");
            }
            _ => panic!("Expected TaskStream event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(WorkflowEvent::task_stream("task1", "exec1", "output", serde_json::Value::Null))
            .unwrap();
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = WorkflowEvent::TaskFailed {
            task_id: "t".to_string(),
            execution_id: "e".to_string(),
            error: "boom".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "taskFailed");
        assert_eq!(json["executionId"], "e");
    }
}
