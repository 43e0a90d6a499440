// SPDX-FileCopyrightText: 2026 Bundle Broker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! bundle-broker - discovers bundle specs and validates broker configuration.

mod catalog;

use std::path::PathBuf;

use broker_config::BrokerConfig;
use clap::{Parser, Subcommand};

/// Service broker for bundles published in container registries and role catalogs.
#[derive(Parser, Debug)]
#[command(name = "bundle-broker", version, about, long_about = None)]
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
    /// Run one discovery pass over every configured registry and print the specs as JSON.
    Catalog,
    /// Validate the configuration and report any problems.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<BrokerConfig, Vec<broker_config::ConfigError>> {
    match path {
        Some(path) => broker_config::load_and_validate_path(path),
        None => broker_config::load_and_validate(),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("bundle_broker={log_level},broker_={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            broker_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Catalog => {
            init_tracing(&config.broker.log_level);
            if let Err(e) = catalog::run_catalog(&config).await {
                eprintln!("bundle-broker: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            println!(
                "bundle-broker: configuration is valid ({} registries)",
                config.registries.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_config_flag() {
        let cli = Cli::try_parse_from(["bundle-broker", "catalog", "--config", "/tmp/broker.toml"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Catalog));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/broker.toml")));
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["bundle-broker"]).is_err());
    }

    #[test]
    fn check_config_subcommand_name() {
        let cli = Cli::try_parse_from(["bundle-broker", "check-config"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
    }
}
