//! Typed extension map for non-serializable dependency injection.
//!
//! `ExecutorExtensions` allows hosts to inject runtime objects (plugin
//! configuration, event sinks, API client factories) into node execution.
//! Extensions are handed to every `NodeExecutor`, making them available to
//! any node during execution.
//!
//! # Example
//!
//! ```ignore
//! use node_engine::{extension_keys, ExecutorExtensions, PluginConfig};
//! use std::sync::Arc;
//!
//! let mut ext = ExecutorExtensions::new();
//! ext.set(extension_keys::PLUGIN_CONFIG, Arc::new(PluginConfig::default()));
//!
//! // In a NodeExecutor:
//! if let Some(config) = extensions.get::<Arc<PluginConfig>>(extension_keys::PLUGIN_CONFIG) {
//!     let token = config.get("huggingface", "huggingFaceAccessToken");
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;

/// Typed extension map for injecting non-serializable dependencies
/// into node execution.
///
/// Unlike `graph_flow::Context` which stores `serde_json::Value`, this map
/// holds arbitrary `Send + Sync` types via `Box<dyn Any>`.
pub struct ExecutorExtensions {
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl ExecutorExtensions {
    /// Create an empty extension map.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert a typed value under the given key.
    ///
    /// If a value already exists for this key, it is replaced.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.inner.insert(key.to_string(), Box::new(value));
    }

    /// Get a reference to a typed value by key.
    ///
    /// Returns `None` if the key doesn't exist or the type doesn't match.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.inner.get(key).and_then(|v| v.downcast_ref())
    }

    /// Check whether a key exists in the map.
    pub fn has(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

impl Default for ExecutorExtensions {
    fn default() -> Self {
        Self::new()
    }
}

/// Well-known extension keys for standard dependencies.
pub mod extension_keys {
    /// Key for `Arc<PluginConfig>`: resolved plugin settings and secrets.
    pub const PLUGIN_CONFIG: &str = "plugin_config";
    /// Key for `Arc<dyn EventSink>`: receives partial outputs.
    pub const EVENT_SINK: &str = "event_sink";
    /// Key for the current execution id (`String`).
    pub const EXECUTION_ID: &str = "execution_id";
    /// Key for a node crate's remote client factory.
    pub const CLIENT_FACTORY: &str = "client_factory";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::events::{EventSink, VecEventSink};

    #[test]
    fn test_set_and_get() {
        let mut ext = ExecutorExtensions::new();
        ext.set(extension_keys::EXECUTION_ID, "exec-1".to_string());

        assert_eq!(
            ext.get::<String>(extension_keys::EXECUTION_ID),
            Some(&"exec-1".to_string())
        );
        assert!(ext.has(extension_keys::EXECUTION_ID));
        assert!(!ext.has("missing"));
    }

    #[test]
    fn test_type_mismatch_returns_none() {
        let mut ext = ExecutorExtensions::new();
        ext.set("count", 42u32);

        assert!(ext.get::<String>("count").is_none());
        assert_eq!(ext.get::<u32>("count"), Some(&42));
    }

    #[test]
    fn test_trait_object_values() {
        let mut ext = ExecutorExtensions::new();
        let sink: Arc<dyn EventSink> = Arc::new(VecEventSink::new());
        ext.set(extension_keys::EVENT_SINK, sink);

        assert!(ext
            .get::<Arc<dyn EventSink>>(extension_keys::EVENT_SINK)
            .is_some());
    }

    #[test]
    fn test_replace_value() {
        let mut ext = ExecutorExtensions::new();
        ext.set("key", "first".to_string());
        ext.set("key", "second".to_string());

        assert_eq!(ext.get::<String>("key"), Some(&"second".to_string()));
    }
}
