//! AstroDISC API — single-paragraph career recommendations from a birth
//! chart and a DISC profile, via the Gemini API with a deterministic local
//! fallback.
//!
//! The library exists so the `gemini-probe` diagnostic binary shares the
//! probing and client code with the server instead of duplicating it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod gemini;
pub mod recommendation;
pub mod routes;
pub mod state;
