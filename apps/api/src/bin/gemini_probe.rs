//! Standalone connectivity diagnostic. Exercises the same client and probing
//! code as the server: checks the credential, lists the available models,
//! then runs the candidate sweep and reports which model would be adopted.
//!
//! Run with `cargo run --bin gemini-probe`.

use anyhow::Result;

use astrodisc_api::config::Config;
use astrodisc_api::gemini::GeminiClient;
use astrodisc_api::recommendation::provider::{
    probe_candidates, GenerativeBackend, ProbeOutcome, CANDIDATE_MODELS,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Per-candidate progress is logged via tracing; default to info so the
    // sweep is visible without RUST_LOG set.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Gemini API connectivity probe");
    println!("{}", "=".repeat(50));

    let config = Config::from_env()?;
    let Some(api_key) = config.gemini_api_key else {
        println!("No GEMINI_API_KEY found in the environment.");
        println!("Create a .env file with: GEMINI_API_KEY=your_key_here");
        std::process::exit(1);
    };

    let visible = api_key.chars().take(10).collect::<String>();
    println!("API key found: {visible}...");

    let client = GeminiClient::new(api_key)?;

    println!("\nListing models...");
    match client.list_models().await {
        Ok(models) => {
            println!("Connection OK, {} models visible:", models.len());
            for model in &models {
                let marker = if model.supports_generate_content() {
                    "+"
                } else {
                    "-"
                };
                println!("  [{marker}] {}", model.name);
            }
        }
        Err(err) => {
            println!("Model listing failed: {err}");
            println!("Continuing to the candidate sweep anyway.");
        }
    }

    println!("\nProbing candidate models ({} candidates)...", CANDIDATE_MODELS.len());
    match probe_candidates(&client, CANDIDATE_MODELS).await {
        ProbeOutcome::Adopted { model } => {
            println!("Success: the server would adopt '{model}'.");
        }
        ProbeOutcome::NoneUsable => {
            println!("No candidate answered the probe.");
            println!("Possible causes: key permissions, regional availability, API version drift.");
            std::process::exit(1);
        }
    }

    Ok(())
}
