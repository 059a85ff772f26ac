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

use anyhow::{Context, Result};
use platter_telemetry::{CounterHandle, HistogramHandle, MetricsRegistry};

const NAMESPACE: &str = "pipeline";

/// A collection of metric handles used by the pipeline agent.
pub(super) struct PipelineMetrics {
    /// Identifiers whose variants and manifest were written.
    pub(super) written: CounterHandle,
    /// Input files that matched no identifier.
    pub(super) unmatched: CounterHandle,
    /// Items that ended in a failure.
    pub(super) failed: CounterHandle,
    /// Identifiers written from placeholder art.
    pub(super) placeholders: CounterHandle,
    /// Wall time per item in milliseconds.
    pub(super) item_time: HistogramHandle,
}

impl PipelineMetrics {
    pub(super) fn new(registry: &MetricsRegistry) -> Result<Self> {
        let counter = |name: &str, description: &str| {
            registry
                .register_counter(NAMESPACE, name, description)
                .with_context(|| format!("Failed to register metric '{NAMESPACE}:{name}'"))
        };

        Ok(Self {
            written: counter("written", "Identifiers written with a complete manifest")?,
            unmatched: counter("unmatched", "Input files matching no catalog identifier")?,
            failed: counter("failed", "Items that ended in a failure")?,
            placeholders: counter("placeholders", "Identifiers written from placeholder art")?,
            item_time: registry
                .register_histogram(
                    NAMESPACE,
                    "item_time",
                    "Time to process one item",
                    "ms",
                    vec![1.0, 5.0, 16.0, 50.0, 100.0, 500.0, 2000.0],
                )
                .context("Failed to register metric 'pipeline:item_time'")?,
        })
    }
}
