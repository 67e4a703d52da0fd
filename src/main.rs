use crate::cli::{Commands, Muniboard};
use crate::server::infra;
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod handlers;
mod routes;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Muniboard::try_parse()?;
    let Commands::Serve {
        shared_options,
        port,
    } = args.command;

    let app_state = server::state::init(shared_options)?;
    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!("Serving departures on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(infra::shutdown_signal())
        .await?;

    info!("Terminating");
    Ok(())
}
