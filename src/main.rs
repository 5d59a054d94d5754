// usbtop - Main Entry Point
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

//! usbtop - top-like USB bandwidth monitor.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use usbtop::application::Application;
use usbtop::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the table and CSV rows own stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    Application::new(cli)?.run().await
}
