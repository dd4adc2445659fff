//! Library-wide constants
//!
//! Single source of truth for hosts, paths and header values.

/// Remote host configuration
pub mod hosts {
    /// Default host of the shared inference API
    pub const INFERENCE_API: &str = "https://api-inference.huggingface.co";
}

/// URL path fragments
pub mod paths {
    /// Prefix for model-addressed requests on the inference API
    pub const MODELS: &str = "models";
}

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!("hf-inference/", env!("CARGO_PKG_VERSION"));
