//! Editor widget descriptors
//!
//! A node lists the controls the host should render in its settings pane.
//! Each control binds to one key of the node's data; `use_input_toggle_data_key`
//! names the boolean flag that switches the value over to an input port.

use serde::{Deserialize, Serialize};

/// A declarative editor control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorDefinition {
    /// Single-line text field
    #[serde(rename_all = "camelCase")]
    String {
        label: String,
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
    },

    /// Numeric field with optional bounds
    #[serde(rename_all = "camelCase")]
    Number {
        label: String,
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        /// Whether the field may be cleared (value becomes absent)
        #[serde(default)]
        allow_empty: bool,
    },

    /// On/off switch
    #[serde(rename_all = "camelCase")]
    Toggle {
        label: String,
        data_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        use_input_toggle_data_key: Option<String>,
    },
}

impl EditorDefinition {
    /// Create a text editor
    pub fn string(label: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self::String {
            label: label.into(),
            data_key: data_key.into(),
            use_input_toggle_data_key: None,
        }
    }

    /// Create an unbounded numeric editor
    pub fn number(label: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self::Number {
            label: label.into(),
            data_key: data_key.into(),
            use_input_toggle_data_key: None,
            min: None,
            max: None,
            step: None,
            allow_empty: false,
        }
    }

    /// Create a toggle editor
    pub fn toggle(label: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self::Toggle {
            label: label.into(),
            data_key: data_key.into(),
            use_input_toggle_data_key: None,
        }
    }

    /// Gate this editor behind an input toggle flag
    pub fn with_input_toggle(mut self, key: impl Into<String>) -> Self {
        match &mut self {
            Self::String {
                use_input_toggle_data_key,
                ..
            }
            | Self::Number {
                use_input_toggle_data_key,
                ..
            }
            | Self::Toggle {
                use_input_toggle_data_key,
                ..
            } => *use_input_toggle_data_key = Some(key.into()),
        }
        self
    }

    /// Set numeric bounds and step. No-op for non-numeric editors.
    pub fn with_range(mut self, lo: Option<f64>, hi: Option<f64>, by: Option<f64>) -> Self {
        if let Self::Number { min, max, step, .. } = &mut self {
            *min = lo;
            *max = hi;
            *step = by;
        }
        self
    }

    /// Allow a numeric editor to be left empty. No-op for other editors.
    pub fn allow_empty(mut self) -> Self {
        if let Self::Number { allow_empty, .. } = &mut self {
            *allow_empty = true;
        }
        self
    }

    /// Data key this editor writes to
    pub fn data_key(&self) -> &str {
        match self {
            Self::String { data_key, .. }
            | Self::Number { data_key, .. }
            | Self::Toggle { data_key, .. } => data_key,
        }
    }

    /// Input toggle flag gating this editor, if any
    pub fn input_toggle(&self) -> Option<&str> {
        match self {
            Self::String {
                use_input_toggle_data_key,
                ..
            }
            | Self::Number {
                use_input_toggle_data_key,
                ..
            }
            | Self::Toggle {
                use_input_toggle_data_key,
                ..
            } => use_input_toggle_data_key.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_toggle() {
        let editor = EditorDefinition::number("Top K", "topK").with_input_toggle("useTopKInput");
        assert_eq!(editor.data_key(), "topK");
        assert_eq!(editor.input_toggle(), Some("useTopKInput"));
    }

    #[test]
    fn test_range_ignored_for_toggle() {
        let editor =
            EditorDefinition::toggle("Do Sample", "doSample").with_range(Some(0.0), None, None);
        assert_eq!(editor, EditorDefinition::toggle("Do Sample", "doSample"));
    }

    #[test]
    fn test_serialization_shape() {
        let editor = EditorDefinition::number("Temperature", "temperature")
            .with_input_toggle("useTemperatureInput")
            .with_range(Some(0.0), Some(2.0), Some(0.1));

        let json = serde_json::to_value(&editor).unwrap();
        assert_eq!(json["type"], "number");
        assert_eq!(json["dataKey"], "temperature");
        assert_eq!(json["useInputToggleDataKey"], "useTemperatureInput");
        assert_eq!(json["max"], 2.0);
        assert_eq!(json["allowEmpty"], false);
    }
}
