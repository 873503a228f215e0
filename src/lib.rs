//! doc-intake: classify submitted content and route it to a format-specific extractor.

pub mod agents;
pub mod classifier;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod pipeline;
