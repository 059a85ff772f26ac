// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Asset catalog generation for meal photographs
// Run with: platter <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::config::{load_config, Overrides};
use helpers::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "platter", version, about = "Turns loosely named photographs into a complete asset catalog", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./Platter.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs one ingestion pass and writes variants and manifests
    Ingest(IngestArgs),
    /// Lists the catalog identifiers
    Catalog,
    /// Shows which identifier each file name resolves to
    Match {
        /// File names to match
        #[arg(required = true)]
        filenames: Vec<String>,
    },
}

#[derive(Args)]
struct IngestArgs {
    /// Directory of photographs to ingest
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Root of the asset catalog to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave identifiers without a photograph unresolved instead of drawing placeholders
    #[arg(long)]
    no_placeholders: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    platter_telemetry::init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    println!("{}{}{} PLATTER {}", BOLD, CYAN, PLATE, RESET);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest(args) => {
            let overrides = Overrides {
                input: args.input,
                output: args.output,
                no_placeholders: args.no_placeholders,
            };
            commands::ingest::ingest(&config, &overrides)
        }
        Commands::Catalog => commands::catalog::list(&config).map(|()| true),
        Commands::Match { filenames } => commands::matching::match_names(&config, &filenames),
    }
}
