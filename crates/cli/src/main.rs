// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! monlock - single-instance guard for the monitor
//!
//! Only one monitor per environment runs at a time: every instance queues on
//! a distributed lock under `<namespace>/<environment>` and the one at the
//! head of the queue holds it until it is stopped.

mod error;
mod monitor;
mod settings;

use anyhow::Result;
use clap::Parser;
use error::MonitorError;
use settings::Overrides;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "monlock",
    version,
    about = "Hold the per-environment monitor lock until stopped"
)]
struct Cli {
    /// The addresses of the ZooKeeper servers to connect to (comma-separated host:port)
    #[arg(long = "zk", value_name = "ADDRS")]
    zk: Option<String>,

    /// The environment the monitor is running in [default: development]
    #[arg(long = "env", value_name = "NAME")]
    environment: Option<String>,

    /// Namespace prefix for lock paths [default: /monitor]
    #[arg(long, value_name = "PREFIX")]
    namespace: Option<String>,

    /// Session timeout, e.g. 10s or 1m [default: 10s]
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    session_timeout: Option<Duration>,

    /// TOML config file; flags take precedence over its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<MonitorError>() {
                Some(monitor_error) => eprint!("{}", monitor_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        ensemble: cli.zk,
        environment: cli.environment,
        namespace_prefix: cli.namespace,
        session_timeout: cli.session_timeout,
    };
    let (config, lock_path) = settings::resolve(cli.config.as_deref(), overrides)
        .map_err(MonitorError::invalid_config)?;

    monitor::run(config, lock_path).await?;
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
