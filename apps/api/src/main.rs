use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use astrodisc_api::cli::run_cli;
use astrodisc_api::config::Config;
use astrodisc_api::gemini::GeminiClient;
use astrodisc_api::recommendation::generator::Recommender;
use astrodisc_api::recommendation::provider::{self, GenerativeBackend, ProviderState};
use astrodisc_api::routes::build_router;
use astrodisc_api::state::AppState;

/// AstroDISC Lite — career recommendations from a birth chart and a DISC
/// profile. Runs as a JSON web API by default, or once in the terminal with
/// `--cli`.
#[derive(Debug, Parser)]
#[command(name = "astrodisc-api", version)]
struct Args {
    /// Run one generation with the sample inputs and print it to stdout.
    #[arg(long)]
    cli: bool,

    /// Bind host for the web server (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port for the web server (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("astrodisc_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AstroDISC API v{}", env!("CARGO_PKG_VERSION"));

    // Resolve the provider state once, before anything is served. Client
    // construction failures degrade to fallback-only, never abort startup.
    let backend: Option<Arc<dyn GenerativeBackend>> = match &config.gemini_api_key {
        Some(key) => match GeminiClient::new(key.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                warn!(error = %err, "could not configure Gemini client, running fallback-only");
                None
            }
        },
        None => None,
    };

    let state = provider::initialize(backend.as_deref()).await;
    match &state {
        ProviderState::RemoteReady { model } => info!(model = %model, "remote generation ready"),
        ProviderState::FallbackOnly => info!("running fallback-only"),
    }

    let recommender = Arc::new(Recommender::new(backend, state));

    if args.cli {
        run_cli(&recommender).await;
        return Ok(());
    }

    let app_state = AppState {
        recommender,
        config: config.clone(),
    };

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
