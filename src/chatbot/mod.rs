//! AI chat integration and the offline transcript summarizer.

pub mod openai;
pub mod provider;
pub mod summarizer;
