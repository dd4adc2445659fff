//! Plugin registration and plugin configuration
//!
//! A plugin contributes node types, configuration entries (API keys and
//! other settings the user fills in once) and context menu groups. Hosts
//! install plugins into a [`NodeRegistry`] and keep the user's values in a
//! [`PluginConfig`], persisted as `plugin-config.json` in the app data dir.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{NodeEngineError, Result};
use crate::registry::NodeRegistry;

/// File name of the persisted plugin configuration
pub const CONFIG_FILE_NAME: &str = "plugin-config.json";

/// Kind of value a configuration entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginConfigType {
    String,
    /// Like `String`, but masked in the UI and never logged
    Secret,
    Number,
    Boolean,
}

/// Declaration of one plugin configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfigSpec {
    #[serde(rename = "type")]
    pub config_type: PluginConfigType,
    pub label: String,
    pub description: String,
    /// Environment variable read when the user has not set a value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_environment_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
}

/// A group in the host's "add node" context menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuGroup {
    pub id: String,
    pub label: String,
}

/// A bundle of node types plus their configuration surface
///
/// `register` is called once by [`NodeRegistry::install_plugin`], after the
/// plugin's config spec and menu groups have been recorded.
pub trait Plugin: Send + Sync {
    /// Stable plugin identifier, used to scope configuration values
    fn id(&self) -> &str;

    /// Human-readable plugin name
    fn name(&self) -> &str;

    /// Configuration entries, in display order
    fn config_spec(&self) -> Vec<(String, PluginConfigSpec)> {
        Vec::new()
    }

    /// Context menu groups contributed by this plugin
    fn context_menu_groups(&self) -> Vec<ContextMenuGroup> {
        Vec::new()
    }

    /// Register the plugin's node types
    fn register(&self, registry: &mut NodeRegistry);
}

/// User-supplied plugin settings
///
/// Values are scoped by plugin id. Lookups fall back to the environment
/// variable named by the entry's spec, once specs have been declared via
/// [`PluginConfig::declare`] or [`PluginConfig::declare_from`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    values: HashMap<String, HashMap<String, String>>,
    #[serde(skip)]
    specs: HashMap<String, HashMap<String, PluginConfigSpec>>,
}

impl PluginConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from disk, or an empty one if the file is absent
    ///
    /// Specs are not persisted: environment fallbacks apply only after
    /// [`PluginConfig::declare`] or [`PluginConfig::declare_from`] has run on
    /// the loaded value.
    pub async fn load(app_data_dir: &Path) -> Result<Self> {
        let config_path = app_data_dir.join(CONFIG_FILE_NAME);

        if !fs::try_exists(&config_path).await? {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).await?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| {
                NodeEngineError::Config(format!("Failed to parse {:?}: {}", config_path, e))
            })?;

        log::info!("Plugin configuration loaded from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to disk
    pub async fn save(&self, app_data_dir: &Path) -> Result<()> {
        fs::create_dir_all(app_data_dir).await?;

        let config_path = app_data_dir.join(CONFIG_FILE_NAME);
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents).await?;

        log::info!("Plugin configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Record the spec entries of a plugin
    pub fn declare(&mut self, plugin_id: &str, specs: &[(String, PluginConfigSpec)]) {
        let entry = self.specs.entry(plugin_id.to_string()).or_default();
        for (key, spec) in specs {
            entry.insert(key.clone(), spec.clone());
        }
    }

    /// Record every spec entry of the plugins installed in `registry`
    pub fn declare_from(&mut self, registry: &NodeRegistry) {
        for (plugin_id, specs) in registry.plugin_config_specs() {
            self.declare(plugin_id, specs);
        }
    }

    /// Set a value explicitly
    pub fn set(&mut self, plugin_id: &str, key: &str, value: impl Into<String>) {
        self.values
            .entry(plugin_id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Remove an explicit value
    pub fn unset(&mut self, plugin_id: &str, key: &str) {
        if let Some(values) = self.values.get_mut(plugin_id) {
            values.remove(key);
        }
    }

    /// Spec declared for an entry, if any
    pub fn spec(&self, plugin_id: &str, key: &str) -> Option<&PluginConfigSpec> {
        self.specs.get(plugin_id).and_then(|specs| specs.get(key))
    }

    /// Look up a value: the explicit one first, then the spec's environment variable
    pub fn get(&self, plugin_id: &str, key: &str) -> Option<String> {
        if let Some(value) = self
            .values
            .get(plugin_id)
            .and_then(|values| values.get(key))
            .filter(|v| !v.is_empty())
        {
            return Some(value.clone());
        }

        let var = self.spec(plugin_id, key)?.pull_environment_variable.as_deref()?;
        std::env::var(var).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_spec(env: &str) -> (String, PluginConfigSpec) {
        (
            "apiToken".to_string(),
            PluginConfigSpec {
                config_type: PluginConfigType::Secret,
                label: "API Token".to_string(),
                description: "Token for the test service".to_string(),
                pull_environment_variable: Some(env.to_string()),
                helper_text: None,
            },
        )
    }

    #[test]
    fn test_explicit_value_wins() {
        let mut config = PluginConfig::new();
        config.declare("test", &[token_spec("NODE_ENGINE_TEST_TOKEN_EXPLICIT")]);
        config.set("test", "apiToken", "abc");
        assert_eq!(config.get("test", "apiToken").as_deref(), Some("abc"));
    }

    #[test]
    fn test_env_fallback() {
        std::env::set_var("NODE_ENGINE_TEST_TOKEN_FALLBACK", "from-env");

        let mut config = PluginConfig::new();
        config.declare("test", &[token_spec("NODE_ENGINE_TEST_TOKEN_FALLBACK")]);
        assert_eq!(config.get("test", "apiToken").as_deref(), Some("from-env"));

        config.set("test", "apiToken", "");
        assert_eq!(config.get("test", "apiToken").as_deref(), Some("from-env"));
    }

    #[test]
    fn test_undeclared_key_has_no_fallback() {
        let config = PluginConfig::new();
        assert!(config.get("test", "apiToken").is_none());
    }

    #[test]
    fn test_unset() {
        let mut config = PluginConfig::new();
        config.set("test", "apiToken", "abc");
        config.unset("test", "apiToken");
        assert!(config.get("test", "apiToken").is_none());
    }

    #[test]
    fn test_spec_serialization() {
        let (_, spec) = token_spec("X_TOKEN");
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "secret");
        assert_eq!(json["pullEnvironmentVariable"], "X_TOKEN");
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = PluginConfig::new();
        config.set("test", "apiToken", "persisted");
        config.save(dir.path()).await.unwrap();

        let loaded = PluginConfig::load(dir.path()).await.unwrap();
        assert_eq!(loaded.get("test", "apiToken").as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_loaded_config_needs_declare_for_env_fallback() {
        std::env::set_var("NODE_ENGINE_TEST_TOKEN_LOADED", "from-env");
        let dir = tempfile::tempdir().unwrap();

        let mut config = PluginConfig::new();
        config.declare("test", &[token_spec("NODE_ENGINE_TEST_TOKEN_LOADED")]);
        config.save(dir.path()).await.unwrap();

        let mut loaded = PluginConfig::load(dir.path()).await.unwrap();
        assert!(loaded.get("test", "apiToken").is_none());

        loaded.declare("test", &[token_spec("NODE_ENGINE_TEST_TOKEN_LOADED")]);
        assert_eq!(loaded.get("test", "apiToken").as_deref(), Some("from-env"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = PluginConfig::load(dir.path()).await.unwrap();
        assert!(loaded.get("test", "apiToken").is_none());
    }
}
