//! Tokio / Axum entry-point for the notes API server.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use notes_backend_lib::{
    auth::start_revocation_sweeper,
    config::{LogFormat, SessionMode, Settings, StorageKind},
    create_router,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "notes-server", about = "Notes API server")]
struct Args {
    /// Configuration file (toml, yaml or json). Defaults to config.* in the working directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Settings::load().context("loading configuration")?,
    };
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    match settings.storage {
        StorageKind::File => {
            let storage = FlatFileStorage::new(&settings.data_dir)?;
            serve(storage, settings).await
        },
        StorageKind::Memory => {
            tracing::warn!("in-memory storage: accounts and notes are lost on restart");
            serve(MemoryStorage::new(), settings).await
        },
    }
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));
    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve<S: Storage + Clone + 'static>(storage: S, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr;
    let sweep_every = settings.session.revocation_sweep_secs;

    match settings.session.mode {
        SessionMode::Strict if settings.session.redis_url.is_some() => {
            tracing::info!("session mode: strict, sessions in redis");
        },
        SessionMode::Strict => tracing::info!("session mode: strict, sessions in process memory"),
        SessionMode::Stateless => tracing::info!("session mode: stateless"),
    }

    let state = Arc::new(AppState::connect(storage, settings).await?);

    let sweeper = (sweep_every > 0).then(|| {
        start_revocation_sweeper(Arc::clone(&state.revocations), Duration::from_secs(sweep_every))
    });

    let app = create_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
