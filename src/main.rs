//! Resale Valuation - Main Entry Point
//!
//! Trains the price model on startup and serves estimates from the command
//! line or the interactive calculator.

use clap::Parser;
use resale_valuation::cli::{
    cmd_generate, cmd_interactive, cmd_predict, cmd_train, cmd_vocab, resolve_config, Cli, Commands,
};
use resale_valuation::preprocessing::PropertyAttributes;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resale_valuation=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.degree, cli.seed)?;

    match cli.command {
        Some(Commands::Interactive { data }) => {
            cmd_interactive(&data, &config)?;
        }
        Some(Commands::Train { data, json }) => {
            cmd_train(&data, &config, json)?;
        }
        Some(Commands::Predict {
            data,
            region,
            unit_type,
            storey_band,
            build_model,
            floor_area,
            remaining_lease,
        }) => {
            let request = PropertyAttributes::new()
                .with_region(region)
                .with_unit_type(unit_type)
                .with_storey_band(storey_band)
                .with_build_model(build_model)
                .with_floor_area(floor_area)
                .with_remaining_lease(remaining_lease);
            cmd_predict(&data, &config, request)?;
        }
        Some(Commands::Vocab { data }) => {
            cmd_vocab(&data, &config)?;
        }
        Some(Commands::Generate { output, rows, seed }) => {
            cmd_generate(&output, rows, seed, &config)?;
        }
        None => {
            // Default: interactive calculator on the bundled sample file
            cmd_interactive(&PathBuf::from("sample_data.csv"), &config)?;
        }
    }

    Ok(())
}
