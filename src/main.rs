use anyhow::Result;
use clap::Parser;
use multiget::signals::Interrupts;
use multiget::{Args, ConsoleObserver, Coordinator, Settings, logging};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Resolves with the name of the first interruption signal received.
async fn interrupted(interrupts: Option<Interrupts>) -> String {
    match interrupts {
        Some(mut interrupts) => interrupts.recv().await.to_string(),
        None => std::future::pending().await,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init_logging();

    let args = Args::parse();
    // Handlers go in before any transfer starts so an early Ctrl+C still
    // goes through cleanup.
    let interrupts = Interrupts::install()
        .inspect_err(|e| warn!(error = %e, "cannot listen for signals"))
        .ok();
    let settings = Settings::load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring invalid settings");
        Settings::default()
    });

    let client = settings.http_client()?;
    let coordinator = Coordinator::new(
        client,
        ".",
        settings.tick_interval,
        Arc::new(ConsoleObserver::new()),
    );

    let report = coordinator.run(args.urls, interrupted(interrupts)).await;
    Ok(report.outcome.exit_code())
}
