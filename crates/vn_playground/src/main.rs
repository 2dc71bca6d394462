// SPDX-License-Identifier: MIT OR Apache-2.0
//! vn playground runner
//!
//! ## Usage
//!
//! `vn_playground [config.ron]`
//!
//! Without a config file every demo runs with default settings. Log output
//! honours `RUST_LOG`.

use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vn_playground::{demos, ConfigError, DemoError, PlaygroundConfig};

/// Failure that ends the run
#[derive(Debug, Error)]
enum PlaygroundError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Demo(#[from] DemoError),
}

fn init_logging() {
    let env_filter = ["vn_playground=debug", "vn_graph=info", "vn_animation=info"]
        .into_iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(config_path: Option<PathBuf>) -> Result<(), PlaygroundError> {
    let config = PlaygroundConfig::load_or_default(config_path.as_deref())?;
    for kind in &config.demos {
        demos::run(*kind, &config)?;
    }
    tracing::info!("Ran {} demo(s)", config.demos.len());
    Ok(())
}

fn main() {
    init_logging();

    tracing::info!("Starting vn playground v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    if let Err(e) = run(config_path) {
        tracing::error!("Playground failed: {e}");
        std::process::exit(1);
    }
}
