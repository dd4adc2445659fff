//! Text-generation backend abstraction
//!
//! A [`ClientFactory`] turns an [`InferenceTarget`] plus credentials into a
//! [`TextGenerationClient`]; the client opens token streams. Keeping
//! construction behind a factory lets callers swap the transport and lets
//! tests observe whether a client was ever built.

pub mod huggingface;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::types::{TextGenerationRequest, TextGenerationStreamOutput};

pub use huggingface::{HfClientFactory, HfInferenceClient};

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stream of generation records, in arrival order
pub type TokenStream =
    Pin<Box<dyn Stream<Item = Result<TextGenerationStreamOutput, BackendError>> + Send>>;

/// Where a generation request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceTarget {
    /// A model id on the shared inference API
    Model(String),
    /// A dedicated inference endpoint URL
    Endpoint(String),
}

/// A client able to open token streams
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Start generating for `request`, yielding one record per token
    async fn text_generation_stream(
        &self,
        request: TextGenerationRequest,
    ) -> Result<TokenStream, BackendError>;
}

/// Builds clients for a target
pub trait ClientFactory: Send + Sync {
    /// Construct a client for `target`, authenticating with `access_token`
    /// when one is given
    fn connect(
        &self,
        target: &InferenceTarget,
        access_token: Option<&str>,
    ) -> Result<Box<dyn TextGenerationClient>, BackendError>;
}
