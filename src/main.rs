// src/main.rs

//! The main entry point for the ZirconDB server application.

use anyhow::Result;
use std::env;
use zircondb::config::Config;
use zircondb::core::state::ServerState;
use zircondb::server;

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--version".to_string()) {
        println!("ZirconDB version {VERSION}");
        return Ok(());
    }

    // An optional positional argument names the configuration file; without
    // one the built-in defaults apply.
    let config = match args.get(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    let state = ServerState::initialize(config)?;
    server::run(state).await?;
    Ok(())
}
