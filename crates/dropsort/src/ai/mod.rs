//! Clients for the external text-generation service.

pub mod backend;
pub mod classifier;
pub mod error;
pub mod ollama;
pub mod prompt;
pub mod summarizer;

pub use backend::{generate_with_timeout, InferenceBackend};
pub use classifier::{Classification, Classifier};
pub use error::InferenceError;
pub use ollama::OllamaClient;
pub use summarizer::Summarizer;
