//! Extensions setup for host applications.
//!
//! Hosts call [`setup_extensions`] at startup so that the chat executor
//! finds the user's plugin configuration and a shared HTTP client factory
//! in `ExecutorExtensions`. Host crates never need to import
//! `hf-inference` directly.
//!
//! # Example
//!
//! ```ignore
//! let config = PluginConfig::load(&app_data_dir).await?;
//! let mut extensions = node_engine::ExecutorExtensions::new();
//! huggingface_nodes::setup_extensions(&mut extensions, config);
//! ```

use std::sync::Arc;

use hf_inference::{ClientFactory, HfClientFactory};
use node_engine::{extension_keys, ExecutorExtensions, Plugin, PluginConfig};

use crate::plugin::{HuggingFacePlugin, PLUGIN_ID};

/// Store `config` and a client factory for the public inference API.
///
/// The plugin's config spec is declared on `config` so the access token
/// falls back to its environment variable.
pub fn setup_extensions(extensions: &mut ExecutorExtensions, config: PluginConfig) {
    setup_extensions_with_clients(extensions, config, Arc::new(HfClientFactory::new()));
}

/// Like [`setup_extensions`], with an explicit client factory (mirrors,
/// self-hosted inference servers, tests).
pub fn setup_extensions_with_clients(
    extensions: &mut ExecutorExtensions,
    mut config: PluginConfig,
    clients: Arc<dyn ClientFactory>,
) {
    config.declare(PLUGIN_ID, &HuggingFacePlugin.config_spec());
    extensions.set(extension_keys::PLUGIN_CONFIG, Arc::new(config));
    extensions.set(extension_keys::CLIENT_FACTORY, clients);

    log::info!("Hugging Face extensions initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::ACCESS_TOKEN_KEY;

    #[test]
    fn test_setup_extensions() {
        let mut config = PluginConfig::new();
        config.set(PLUGIN_ID, ACCESS_TOKEN_KEY, "hf_test");

        let mut extensions = ExecutorExtensions::new();
        setup_extensions(&mut extensions, config);

        let stored = extensions
            .get::<Arc<PluginConfig>>(extension_keys::PLUGIN_CONFIG)
            .unwrap();
        assert_eq!(stored.get(PLUGIN_ID, ACCESS_TOKEN_KEY).as_deref(), Some("hf_test"));
        assert!(stored.spec(PLUGIN_ID, ACCESS_TOKEN_KEY).is_some());
        assert!(extensions
            .get::<Arc<dyn ClientFactory>>(extension_keys::CLIENT_FACTORY)
            .is_some());
    }
}
