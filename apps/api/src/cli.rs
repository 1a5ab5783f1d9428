//! One-shot CLI path: same generation pipeline as the web route, printed to
//! stdout with the fixed sample inputs.

use crate::recommendation::generator::{Recommender, Source};
use crate::recommendation::prompts::{DEFAULT_BIRTH_CHART, DEFAULT_DISC_PROFILE};

pub async fn run_cli(recommender: &Recommender) {
    println!("AstroDISC Lite - Career Recommendation Generator");
    println!("{}", "=".repeat(60));
    println!("Birth Chart:  {DEFAULT_BIRTH_CHART}");
    println!("DISC Profile: {DEFAULT_DISC_PROFILE}");
    println!("{}", "=".repeat(60));

    let recommendation = recommender
        .generate(DEFAULT_BIRTH_CHART, DEFAULT_DISC_PROFILE)
        .await;

    match recommendation.source {
        Source::Remote => println!("\nAI-Generated Career Recommendation:"),
        Source::Fallback => println!("\nGenerated Career Recommendation (offline fallback):"),
    }
    println!("{}", "-".repeat(60));
    println!("{}", recommendation.paragraph);
    println!("{}", "-".repeat(60));

    if recommendation.source == Source::Fallback {
        println!("\nTo enable remote generation, set GEMINI_API_KEY in the environment or a .env file.");
    }
}
