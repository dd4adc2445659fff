//! Processing nodes
//!
//! Nodes that generate data through a remote model.

mod chat_huggingface;

pub use chat_huggingface::{
    ChatHuggingFaceExecutor, ChatHuggingFaceNode, ChatHuggingFaceNodeData, ChatHuggingFaceTask,
};
