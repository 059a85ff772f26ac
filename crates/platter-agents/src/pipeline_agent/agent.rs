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

//! The PipelineAgent drives one ingestion pass from input files to manifests.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use platter_core::{
    ArtifactStore, AssetIdentifier, CatalogEntry, CatalogRegistry, PipelineError, SourceImage,
    VariantArtifact,
};
use platter_lanes::{
    FileSystemStore, ImageDecodeLane, ManifestWriter, MatchResult, NameMatcher,
    PlaceholderRenderer, Resolution, VariantResolver,
};
use platter_telemetry::{MetricsRegistry, ScopedMetricTimer};

use super::config::PipelineConfig;
use super::metrics::PipelineMetrics;
use super::outcome::{ItemOutcome, ItemState, PipelineReport, SourceKind};

/// Runs ingestion passes against a fixed catalog and output store.
///
/// The agent holds no state between passes other than the read-only catalog
/// and its lanes, so running the same inputs twice writes the same bytes.
pub struct PipelineAgent {
    catalog: Arc<CatalogRegistry>,
    config: PipelineConfig,
    matcher: NameMatcher,
    decoder: ImageDecodeLane,
    resolver: VariantResolver,
    renderer: PlaceholderRenderer,
    manifests: ManifestWriter,
    store: Box<dyn ArtifactStore>,
    metrics: PipelineMetrics,
}

impl PipelineAgent {
    /// Creates a new `PipelineAgent` writing under `config.output_root`.
    pub fn new(
        catalog: Arc<CatalogRegistry>,
        config: PipelineConfig,
        metrics_registry: Arc<MetricsRegistry>,
    ) -> Result<Self> {
        let metrics = PipelineMetrics::new(&metrics_registry)?;
        let renderer = PlaceholderRenderer::new(&config.fonts);
        log::debug!("Placeholder text uses '{}'", renderer.typeface_name());

        Ok(Self {
            matcher: NameMatcher::new(catalog.clone()),
            decoder: ImageDecodeLane,
            resolver: VariantResolver::new(config.output_format),
            renderer,
            manifests: ManifestWriter::new(),
            store: Box::new(FileSystemStore::new(&config.output_root)),
            catalog,
            config,
            metrics,
        })
    }

    /// Replaces the filesystem store, e.g. with one that records or fails writes.
    pub fn with_store(mut self, store: impl ArtifactStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Swaps the placeholder renderer, bypassing font resolution.
    pub fn with_renderer(mut self, renderer: PlaceholderRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// The settings this agent was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes `inputs`, then every catalog identifier none of them matched.
    ///
    /// Inputs are processed in sorted path order regardless of the order they
    /// are given in. When several files match one identifier, the first in
    /// that order that decodes is the source and the others fail with
    /// [`PipelineError::DuplicateSource`]. If none decodes, the first one is
    /// kept and falls back like any unreadable source.
    pub fn run(&self, inputs: &[PathBuf]) -> PipelineReport {
        let mut inputs = inputs.to_vec();
        inputs.sort();
        inputs.dedup();
        log::info!(
            "Ingesting {} file(s) into '{}'",
            inputs.len(),
            self.config.output_root.display()
        );

        // Outcomes stay index-aligned with `inputs`.
        let mut outcomes = Vec::with_capacity(inputs.len() + self.catalog.len());
        let mut claims: BTreeMap<AssetIdentifier, Vec<usize>> = BTreeMap::new();
        for path in &inputs {
            let mut outcome = ItemOutcome::for_input(path);
            if let Some(entry) = self.match_input(&mut outcome) {
                claims.entry(entry.id.clone()).or_default().push(outcomes.len());
            }
            outcomes.push(outcome);
        }

        for (id, members) in &claims {
            let Some(entry) = self.catalog.get(id) else {
                continue;
            };
            let _timer = ScopedMetricTimer::new(&self.metrics.item_time);
            self.process_claim(entry, &inputs, members, &mut outcomes);
        }

        for entry in self.catalog.iter() {
            if claims.contains_key(&entry.id) {
                continue;
            }
            let _timer = ScopedMetricTimer::new(&self.metrics.item_time);
            outcomes.push(self.process_missing(entry));
        }

        let report = PipelineReport {
            outcomes,
            guidance: self.matcher.guidance().into_iter().cloned().collect(),
        };
        self.record(&report);
        log::info!(
            "Pass finished: {} written ({} placeholder), {} unmatched, {} unresolved, {} failed",
            report.written(),
            report.placeholders(),
            report.unmatched(),
            report.unresolved(),
            report.failed()
        );
        report
    }

    /// Matches an input's file name. Unmatched inputs are finished here.
    fn match_input(&self, outcome: &mut ItemOutcome) -> Option<&CatalogEntry> {
        let filename = outcome.label();
        let found = match self.matcher.match_name(&filename) {
            MatchResult::Matched(id) => self.catalog.get(&id),
            MatchResult::NoMatch { .. } => None,
        };
        let Some(entry) = found else {
            let normalized = NameMatcher::normalize(&filename);
            log::warn!(
                "'{}' matches no catalog identifier (normalized to '{}')",
                filename,
                normalized
            );
            outcome.finish_with(
                ItemState::Unmatched,
                PipelineError::NoMatch {
                    filename,
                    normalized,
                },
            );
            return None;
        };

        outcome.identifier = Some(entry.id.clone());
        outcome.advance(ItemState::Matched);
        Some(entry)
    }

    /// Picks the source among the inputs that matched `entry` and produces it.
    ///
    /// `members` index into `inputs` and `outcomes`, in sorted path order.
    fn process_claim(
        &self,
        entry: &CatalogEntry,
        inputs: &[PathBuf],
        members: &[usize],
        outcomes: &mut [ItemOutcome],
    ) {
        let mut decoded = None;
        let mut errors = Vec::new();
        for &i in members {
            match self.decoder.load_path(&inputs[i]) {
                Ok(source) => {
                    decoded = Some((i, source));
                    break;
                }
                Err(error) => errors.push(error),
            }
        }

        let Some(&first) = members.first() else {
            return;
        };
        let chosen = decoded.as_ref().map_or(first, |(i, _)| *i);
        for &i in members.iter().filter(|&&i| i != chosen) {
            let error = PipelineError::DuplicateSource {
                path: inputs[i].clone(),
                identifier: entry.id.clone(),
                chosen: inputs[chosen].clone(),
            };
            log::error!("{}", error);
            outcomes[i].finish_with(ItemState::Failed, error);
        }

        let outcome = &mut outcomes[chosen];
        let filename = outcome.label();
        match decoded {
            Some((_, source)) => {
                log::debug!("'{}' -> '{}' ({})", filename, entry.id, source.size());
                self.produce(entry, Some(&source), SourceKind::Photograph, outcome);
            }
            None => {
                let Some(error) = errors.into_iter().next() else {
                    return;
                };
                if self.config.synthesize_missing {
                    log::warn!("{}; using placeholder art for '{}'", error, entry.id);
                    let reason = error.to_string();
                    self.produce(entry, None, SourceKind::Fallback { reason }, outcome);
                } else {
                    log::warn!("{}; '{}' left unresolved", error, entry.id);
                    outcome.finish_with(ItemState::Unresolved, error);
                }
            }
        }
        self.log_terminal(outcome);
    }

    fn process_missing(&self, entry: &CatalogEntry) -> ItemOutcome {
        let mut outcome = ItemOutcome::for_identifier(&entry.id);
        if self.config.synthesize_missing {
            self.produce(entry, None, SourceKind::Placeholder, &mut outcome);
        } else {
            log::warn!("No source for '{}'; left unresolved", entry.id);
            outcome.advance(ItemState::Unresolved);
        }
        self.log_terminal(&outcome);
        outcome
    }

    /// Drives a matched item through resolution and writing.
    fn produce(
        &self,
        entry: &CatalogEntry,
        source: Option<&SourceImage>,
        kind: SourceKind,
        outcome: &mut ItemOutcome,
    ) {
        let artifacts = match self.resolve(entry, source) {
            Ok(artifacts) => artifacts,
            Err(error) => {
                outcome.finish_with(ItemState::Failed, error);
                return;
            }
        };
        outcome.source = Some(kind);
        outcome.advance(ItemState::Resolved);

        match self.persist(entry, &artifacts, &mut outcome.written) {
            Ok(()) => outcome.advance(ItemState::Written),
            Err(error) => outcome.finish_with(ItemState::Failed, error),
        }
    }

    /// Produces every required variant, rendering placeholder art when there is no source.
    fn resolve(
        &self,
        entry: &CatalogEntry,
        source: Option<&SourceImage>,
    ) -> Result<Vec<VariantArtifact>, PipelineError> {
        let captioned;
        let source = match source {
            Some(photo) if entry.caption => {
                captioned = self.caption(entry, photo)?;
                Some(&captioned)
            }
            other => other,
        };

        let plans = match self.resolver.resolve(entry, source) {
            Ok(Resolution::Ready(artifacts)) => return Ok(artifacts),
            Ok(Resolution::NeedsSynthesis(plans)) => plans,
            Err(e) => return Err(e.into_pipeline_error(&entry.id)),
        };

        let Some(largest) = plans.first() else {
            return Ok(Vec::new());
        };
        let art = self
            .renderer
            .render_entry(entry, largest.size)
            .map_err(|e| e.into_pipeline_error(&entry.id))?;
        self.resolver
            .derive(entry, &art)
            .map_err(|e| e.into_pipeline_error(&entry.id))
    }

    /// Crops the photo to the largest variant and draws the entry's caption on it.
    fn caption(
        &self,
        entry: &CatalogEntry,
        photo: &SourceImage,
    ) -> Result<SourceImage, PipelineError> {
        let fitted = self
            .resolver
            .fit(entry, photo)
            .map_err(|e| e.into_pipeline_error(&entry.id))?;
        self.renderer
            .caption(entry, &fitted)
            .map_err(|e| e.into_pipeline_error(&entry.id))
    }

    /// Writes the variants, then the manifest. The first failed write stops the item.
    fn persist(
        &self,
        entry: &CatalogEntry,
        artifacts: &[VariantArtifact],
        written: &mut Vec<PathBuf>,
    ) -> Result<(), PipelineError> {
        let namespace = entry.namespace();
        for artifact in artifacts {
            let path = artifact.relative_path(&namespace);
            self.store
                .write(&path, &artifact.bytes)
                .map_err(|source| PipelineError::Write {
                    path: path.clone(),
                    source,
                })?;
            written.push(path);
        }

        let manifest = self
            .manifests
            .write(entry, artifacts, self.store.as_ref())
            .map_err(|e| e.into_pipeline_error(&entry.id))?;
        written.push(manifest);
        Ok(())
    }

    fn log_terminal(&self, outcome: &ItemOutcome) {
        let label = outcome.label();
        match (outcome.state, &outcome.error) {
            (ItemState::Written, _) => log::info!(
                "[{}] written ({} file(s))",
                label,
                outcome.written.len()
            ),
            (ItemState::Failed, Some(error)) => log::error!("[{}] failed: {}", label, error),
            (state, _) => log::debug!("[{}] {}", label, state),
        }
    }

    fn record(&self, report: &PipelineReport) {
        let updates = [
            (&self.metrics.written, report.written()),
            (&self.metrics.unmatched, report.unmatched()),
            (&self.metrics.failed, report.failed()),
            (&self.metrics.placeholders, report.placeholders()),
        ];
        for (counter, amount) in updates {
            if let Err(e) = counter.increment_by(amount as u64) {
                log::warn!("Failed to record metric '{}': {}", counter.id(), e);
            }
        }
        match self.metrics.item_time.count() {
            Ok(timed) => log::debug!("{} item(s) timed so far", timed),
            Err(e) => log::warn!("Failed to read metric '{}': {}", self.metrics.item_time.id(), e),
        }
    }
}
