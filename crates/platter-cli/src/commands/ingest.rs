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

use crate::commands::config::{Overrides, PlatterConfig};
use crate::helpers::*;
use anyhow::Result;
use platter_agents::{discover_inputs, PipelineAgent, PipelineReport, SourceKind};
use platter_telemetry::{MetricsRegistry, Stopwatch};
use std::sync::Arc;

/// Runs one pass. Returns `Ok(false)` when any item failed.
pub fn ingest(config: &PlatterConfig, overrides: &Overrides) -> Result<bool> {
    print_task_start("Ingesting Photographs", CAMERA, MAGENTA);

    let input_dir = config.input_dir(overrides)?;
    let pipeline_config = config.pipeline_config(overrides)?;
    let catalog = Arc::new(config.catalog()?);

    let inputs = discover_inputs(&input_dir)?;
    println!(
        "{}🔎 Found:{} {} image file(s) in '{}' for {} catalog identifier(s).",
        BOLD,
        RESET,
        inputs.len(),
        input_dir.display(),
        catalog.len()
    );
    if !pipeline_config.synthesize_missing {
        print_info("Placeholder synthesis is off; identifiers without a photograph stay unresolved.");
    }

    let registry = Arc::new(MetricsRegistry::new());
    let agent = PipelineAgent::new(catalog, pipeline_config, registry.clone())?;
    let stopwatch = Stopwatch::new();
    let report = agent.run(&inputs);

    print_report(&report);
    log::debug!("{} metric(s) recorded", registry.metric_count());
    for snapshot in registry.snapshot() {
        log::debug!("{}", snapshot);
    }

    let elapsed = stopwatch.elapsed().as_secs_f64();
    if report.is_success() {
        print_success(&format!(
            "Wrote {} asset(s) to '{}' in {:.2}s",
            report.written(),
            agent.config().output_root.display(),
            elapsed
        ));
        Ok(true)
    } else {
        print_error(&format!(
            "{} item(s) failed after {:.2}s",
            report.failed(),
            elapsed
        ));
        Ok(false)
    }
}

fn print_report(report: &PipelineReport) {
    println!(
        "\n{}Summary:{} {}{} written{} ({} placeholder), {}{} unmatched{}, {}{} unresolved{}, {}{} failed{}",
        BOLD,
        RESET,
        GREEN,
        report.written(),
        RESET,
        report.placeholders(),
        YELLOW,
        report.unmatched(),
        RESET,
        YELLOW,
        report.unresolved(),
        RESET,
        RED,
        report.failed(),
        RESET
    );

    for outcome in &report.outcomes {
        if let Some(SourceKind::Fallback { reason }) = &outcome.source {
            print_warning(&format!("{}: used placeholder art ({})", outcome.label(), reason));
        }
    }

    let unmatched = report.unmatched_files();
    if !unmatched.is_empty() {
        println!("\n{}{}Unmatched files:{}", BOLD, YELLOW, RESET);
        for path in unmatched {
            println!("   {} {}", CROSS, path.display());
        }
        println!(
            "\n{}Rename them to one of the valid identifiers (case and spaces are ignored):{}",
            BOLD, RESET
        );
        let ids: Vec<&str> = report.guidance.iter().map(|id| id.as_str()).collect();
        print_wrapped_list(&ids);
    }

    let unresolved = report.unresolved_identifiers();
    if !unresolved.is_empty() {
        println!("\n{}{}Unresolved identifiers:{}", BOLD, YELLOW, RESET);
        let ids: Vec<&str> = unresolved.iter().map(|id| id.as_str()).collect();
        print_wrapped_list(&ids);
    }

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("\n{}{}Failures:{}", BOLD, RED, RESET);
        for (outcome, error) in failures {
            println!("   {} {}: {}", CROSS, outcome.label(), error);
        }
    }
}
