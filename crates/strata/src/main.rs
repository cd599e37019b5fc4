// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strata - complexity-tiered request routing.
//!
//! This is the binary entry point. Every command prints JSON to stdout.

mod engine;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use strata_config::StrataConfig;
use strata_core::{Request, RequestPreferences};
use tokio_util::sync::CancellationToken;

use crate::engine::Engine;

/// Strata - complexity-tiered request routing.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a query without processing it.
    Assess { query: String },
    /// Route a query through its tier and print the response.
    Route {
        query: String,
        /// Caller id attached to the request.
        #[arg(long, default_value = "cli")]
        user: String,
        /// Prefer answer quality over latency.
        #[arg(long)]
        prioritize_quality: bool,
    },
    /// Show router, tracker and intervention status.
    Status,
    /// List the built-in reasoning tools with their argument schemas.
    Tools,
    /// Print the effective configuration.
    Config,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strata={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> StrataConfig {
    let loaded = match path {
        Some(path) => strata_config::load_and_validate_path(path),
        None => strata_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            strata_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("strata: failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}

fn build_request(query: String, user: String, prioritize_quality: bool) -> Request {
    let request = Request::new(query, user);
    if prioritize_quality {
        request.with_preferences(RequestPreferences {
            prioritize_quality: true,
            ..RequestPreferences::default()
        })
    } else {
        request
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.agent.log_level);

    match cli.command {
        Commands::Config => {
            print_json(&config);
            return;
        }
        Commands::Tools => {
            print_json(&strata_tools::reasoning_tools().tool_definitions());
            return;
        }
        _ => {}
    }

    let engine = Engine::from_config(&config);
    let cancel = CancellationToken::new();
    let _tasks = engine.start(&cancel);

    match cli.command {
        Commands::Assess { query } => {
            print_json(&engine.router().test_complexity_assessment(&query).await);
        }
        Commands::Route {
            query,
            user,
            prioritize_quality,
        } => {
            let request = build_request(query, user, prioritize_quality);
            let response = engine.handle(&request).await;
            print_json(&response);
            if response.is_error() {
                engine.shutdown(&cancel);
                std::process::exit(2);
            }
        }
        Commands::Status => {
            print_json(&engine.status().await);
        }
        Commands::Config | Commands::Tools => {}
    }

    engine.shutdown(&cancel);
}
