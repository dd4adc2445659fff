//! Hugging Face plugin
//!
//! Bundles the chat node with its configuration surface: the access token
//! entry and the "Hugging Face" context menu group.

use std::sync::Arc;

use node_engine::{
    ContextMenuGroup, NodeRegistry, Plugin, PluginConfig, PluginConfigSpec, PluginConfigType,
    TaskDescriptor,
};

use crate::processing::{ChatHuggingFaceExecutor, ChatHuggingFaceNode};

/// Plugin identifier, also the scope of its configuration values
pub const PLUGIN_ID: &str = "huggingface";
/// Configuration key of the access token
pub const ACCESS_TOKEN_KEY: &str = "huggingFaceAccessToken";
/// Environment variable read when no access token is configured
pub const ACCESS_TOKEN_ENV: &str = "HUGGING_FACE_ACCESS_TOKEN";

/// The Hugging Face plugin
#[derive(Debug, Clone, Copy, Default)]
pub struct HuggingFacePlugin;

impl HuggingFacePlugin {
    fn access_token_spec() -> PluginConfigSpec {
        PluginConfigSpec {
            config_type: PluginConfigType::Secret,
            label: "Hugging Face Access Token".to_string(),
            description: "Your access token for the Hugging Face API.".to_string(),
            pull_environment_variable: Some(ACCESS_TOKEN_ENV.to_string()),
            helper_text: Some("Create at https://huggingface.co/settings/tokens".to_string()),
        }
    }
}

impl Plugin for HuggingFacePlugin {
    fn id(&self) -> &str {
        PLUGIN_ID
    }

    fn name(&self) -> &str {
        "Hugging Face"
    }

    fn config_spec(&self) -> Vec<(String, PluginConfigSpec)> {
        vec![(ACCESS_TOKEN_KEY.to_string(), Self::access_token_spec())]
    }

    fn context_menu_groups(&self) -> Vec<ContextMenuGroup> {
        vec![ContextMenuGroup {
            id: PLUGIN_ID.to_string(),
            label: "Hugging Face".to_string(),
        }]
    }

    fn register(&self, registry: &mut NodeRegistry) {
        registry.register_executor(
            ChatHuggingFaceNode::descriptor(),
            Arc::new(ChatHuggingFaceExecutor),
        );
        log::info!("Hugging Face plugin registered node '{}'", ChatHuggingFaceNode::NODE_TYPE);
    }
}

/// Configuration with no explicit values, reading the token from the environment
pub fn default_plugin_config() -> PluginConfig {
    let mut config = PluginConfig::new();
    config.declare(PLUGIN_ID, &HuggingFacePlugin.config_spec());
    config
}
