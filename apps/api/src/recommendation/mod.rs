//! Career recommendation pipeline: provider probing, prompt construction,
//! remote generation with deterministic fallback, and the HTTP handlers.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod provider;
