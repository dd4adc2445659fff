//! Streaming text-generation client
//!
//! This library talks to a hosted text-generation service and hands back
//! generated tokens as they arrive:
//! - **Inference API**: shared hosting, addressed by model id
//! - **Inference Endpoints**: a dedicated deployment, addressed by URL
//!
//! Callers depend on the [`TextGenerationClient`] and [`ClientFactory`]
//! traits so that tests and alternative hosts can swap the transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//! use hf_inference::{ClientFactory, HfClientFactory, InferenceTarget, TextGenerationRequest};
//!
//! let factory = HfClientFactory::new();
//! let client = factory.connect(&InferenceTarget::Model("gpt2".into()), Some("hf_xxx"))?;
//!
//! let mut stream = client
//!     .text_generation_stream(TextGenerationRequest::new("Once upon a time"))
//!     .await?;
//! while let Some(output) = stream.next().await {
//!     print!("{}", output?.token.text);
//! }
//! ```

pub mod backend;
pub mod constants;
pub mod types;

// Re-exports for convenience
pub use backend::{
    BackendError, ClientFactory, HfClientFactory, HfInferenceClient, InferenceTarget,
    TextGenerationClient, TokenStream,
};
pub use types::{TextGenerationParameters, TextGenerationRequest, TextGenerationStreamOutput, Token};
