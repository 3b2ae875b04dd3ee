// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
//
//! strength_predict - CLI binary for model-based compressive strength
//!
//! Takes a JSON mix design on stdin or as --json argument, runs it through
//! the pre-fitted scaler and regressor, and prints a PredictionReport.
//!
//! Usage:
//!   echo '{"cement":150,"slag":0,"fly_ash":0,"water":150,"sp":5,"coarse_agg":900,"fine_agg":800,"age":28}' | strength_predict
//!   strength_predict --json '{"cement":150,...}' --plain
//!
//! Exit codes: 0 ok, 1 invalid input or configuration, 2 artifacts unavailable.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use strength_core::config::{load_config, locate_config};
use strength_core::guardrails::GuardrailEngine;
use strength_core::prediction_kernel::Predictor;
use strength_core::report;
use strength_core::tensors::MixDesignInput;
use strength_core::{logging, StrengthError};

#[derive(Parser, Debug)]
#[command(name = "strength_predict")]
#[command(about = "Predict concrete compressive strength from a mix design", long_about = None)]
#[command(version)]
struct Cli {
    /// Mix design JSON (read from stdin when omitted)
    #[arg(long)]
    json: Option<String>,

    /// Config file (defaults to ./strength.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scaler artifact, overrides the config file
    #[arg(long, env = "STRENGTH_SCALER")]
    scaler: Option<PathBuf>,

    /// Model artifact, overrides the config file
    #[arg(long, env = "STRENGTH_MODEL")]
    model: Option<PathBuf>,

    /// Print one human-readable line instead of JSON
    #[arg(long)]
    plain: bool,

    /// Log filter when RUST_LOG is unset, overrides the config file
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<StrengthError>() {
        Some(StrengthError::ArtifactUnavailable { .. }) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = locate_config(cli.config.as_deref());
    let config = load_config(config_path.as_deref())?;
    logging::init(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    match &config_path {
        Some(path) => tracing::info!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file, using defaults"),
    }

    let mut paths = config.artifacts;
    if let Some(scaler) = cli.scaler {
        paths.scaler = scaler;
    }
    if let Some(model) = cli.model {
        paths.model = model;
    }

    let predictor =
        Predictor::startup(&paths).with_guardrails(GuardrailEngine::with_limits(config.guardrails));
    let input = get_input(cli.json)?;
    let mix = MixDesignInput::from_json(&input)?;
    let report = predictor.predict_mix(mix)?;

    if cli.plain {
        println!("{}", report::prediction_line(report.strength_mpa));
        for advisory in &report.advisories {
            eprintln!("warning: {}", advisory.message());
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn get_input(json: Option<String>) -> Result<String> {
    if let Some(json) = json {
        return Ok(json);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read mix design from stdin")?;
    Ok(buf)
}
