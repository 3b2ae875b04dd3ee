// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
//
//! cube_strength - compressive strength from a cube load test
//!
//! Usage:
//!   cube_strength --load-kn 675 --side-mm 150
//!   cube_strength --load-kn 100 --plain

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use strength_core::{logging, report, LoadTestEngine, StrengthClass};

#[derive(Parser, Debug)]
#[command(name = "cube_strength")]
#[command(about = "Compressive strength of a concrete cube from its failure load", long_about = None)]
#[command(version)]
struct Cli {
    /// Maximum load at failure (kN)
    #[arg(long = "load-kn", visible_alias = "load", allow_negative_numbers = true)]
    load_kn: f64,

    /// Cube side length (mm)
    #[arg(long = "side-mm", visible_alias = "side", default_value_t = 150.0, allow_negative_numbers = true)]
    side_mm: f64,

    /// Print human-readable lines instead of JSON
    #[arg(long)]
    plain: bool,
}

fn main() -> ExitCode {
    logging::init("warn");
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let result = LoadTestEngine::calculate(cli.load_kn, cli.side_mm)?;

    if cli.plain {
        for line in report::load_test_lines(result.area_mm2, result.area_m2, result.strength_mpa) {
            println!("{}", line);
        }
    } else {
        let output = json!({
            "area_mm2": result.area_mm2,
            "area_m2": result.area_m2,
            "strength_mpa": result.strength_mpa,
            "strength_class": StrengthClass::classify(result.strength_mpa),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
