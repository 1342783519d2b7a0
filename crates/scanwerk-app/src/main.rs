// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — batch acquisition test harness
//
// Entry point. Initialises logging, parses arguments, and hands the device
// subsystem to the runner. Logs go to stderr; stdout carries one line per
// saved file.

mod chooser;
mod cli;
mod runner;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use scanwerk_core::config::AppConfig;

use cli::{Cli, TestSelection, USAGE};
use runner::Runner;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (Some(test_to_run), Some(output_directory)) = (cli.test_to_run, cli.output_directory)
    else {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    };

    let selection = match TestSelection::parse(&test_to_run) {
        Ok(selection) => selection,
        Err(err) => {
            println!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Scanwerk starting");

    let subsystem = scanwerk_bridge::device_subsystem(chooser::chooser_for_terminal());
    let runner = Runner::new(AppConfig::default());
    let report = runner.run(subsystem, selection, &output_directory, &mut io::stdout().lock());
    report.exit_code()
}
