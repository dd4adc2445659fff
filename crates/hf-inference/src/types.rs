//! Request and response types for text generation

use serde::{Deserialize, Serialize};

/// Sampling and length controls sent with a generation request
///
/// Unset fields are left out of the request so the service applies its
/// own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
    /// Upper bound on generation time, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

/// A streaming generation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextGenerationRequest {
    /// Prompt text
    pub inputs: String,
    pub parameters: TextGenerationParameters,
}

impl TextGenerationRequest {
    pub fn new(inputs: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            parameters: TextGenerationParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: TextGenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// JSON body for the wire, always asking for a streamed response
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "inputs": self.inputs,
            "parameters": self.parameters,
            "stream": true,
        })
    }
}

/// One generated token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub logprob: Option<f64>,
    /// Control token (end of sequence, padding, ...) carrying no visible text
    #[serde(default)]
    pub special: bool,
}

impl Token {
    /// Shorthand used by fakes and tests
    pub fn text(id: u32, text: impl Into<String>, special: bool) -> Self {
        Self {
            id,
            text: text.into(),
            logprob: None,
            special,
        }
    }
}

/// One record of the generation stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationStreamOutput {
    pub token: Token,
    /// Full text, only present on the final record
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl From<Token> for TextGenerationStreamOutput {
    fn from(token: Token) -> Self {
        Self {
            token,
            generated_text: None,
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_omits_unset_parameters() {
        let request = TextGenerationRequest::new("Hi").with_parameters(TextGenerationParameters {
            temperature: Some(0.5),
            max_new_tokens: Some(16),
            ..Default::default()
        });

        let body = request.to_body();
        assert_eq!(body["inputs"], "Hi");
        assert_eq!(body["stream"], true);
        assert_eq!(body["parameters"]["max_new_tokens"], 16);
        assert!(body["parameters"].get("top_k").is_none());
    }

    #[test]
    fn test_parse_stream_record() {
        let data = r#"{"token":{"id":22557,"text":"Hello","logprob":-0.02,"special":false},"generated_text":null,"details":null}"#;
        let record: TextGenerationStreamOutput = serde_json::from_str(data).unwrap();
        assert_eq!(record.token.text, "Hello");
        assert!(!record.token.special);
        assert!(record.generated_text.is_none());
    }

    #[test]
    fn test_special_defaults_to_false() {
        let data = r#"{"token":{"id":1,"text":"x"}}"#;
        let record: TextGenerationStreamOutput = serde_json::from_str(data).unwrap();
        assert!(!record.token.special);
        assert!(record.token.logprob.is_none());
    }
}
