//! Tempo server entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tempo::{
    create_router, AdvisoryGateway, ApiCompletionProvider, Config, RestApiConfig, Scheduler,
    WorkingHours,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tempo: AI-assisted scheduling engine
#[derive(Parser, Debug)]
#[command(name = "tempo")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default behavior)
    Serve {
        /// HTTP port. If not specified, uses the config file value.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> tempo::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let port = match args.command {
        Some(Command::Serve { port }) => port,
        None => None,
    }
    .unwrap_or(config.server.http_port);

    let provider = ApiCompletionProvider::from_config(&config.advisory)?;
    let default_hours = WorkingHours {
        start: config.scheduling.working_hours_start.clone(),
        end: config.scheduling.working_hours_end.clone(),
    };
    let scheduler = Arc::new(Scheduler::new(AdvisoryGateway::new(provider, default_hours)));

    let router = create_router(scheduler, &RestApiConfig::default());
    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Tempo listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
