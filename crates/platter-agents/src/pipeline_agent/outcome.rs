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

//! Per-item state machine and the report of a pass.

use platter_core::{AssetIdentifier, PipelineError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an item is in its lifecycle.
///
/// ```text
/// Discovered -> Matched | Unmatched
/// Matched    -> Resolved | Unresolved | Failed
/// Resolved   -> Written | Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Found on disk, not yet matched.
    Discovered,
    /// Bound to a catalog identifier.
    Matched,
    /// Terminal: the name matches no identifier.
    Unmatched,
    /// Every required variant exists in memory.
    Resolved,
    /// Terminal: no source and synthesis is disabled. Nothing was written.
    Unresolved,
    /// Terminal: variants and manifest are on disk.
    Written,
    /// Terminal: a component failed for this item.
    Failed,
}

impl ItemState {
    /// Whether processing of the item is over.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ItemState::Unmatched | ItemState::Unresolved | ItemState::Written | ItemState::Failed
        )
    }

    /// Whether `self -> next` is an edge of the state machine.
    pub fn can_transition(self, next: ItemState) -> bool {
        use ItemState::*;
        matches!(
            (self, next),
            (Discovered, Matched)
                | (Discovered, Unmatched)
                | (Matched, Resolved)
                | (Matched, Unresolved)
                | (Matched, Failed)
                | (Resolved, Written)
                | (Resolved, Failed)
        )
    }

    /// Lower-case label for logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Discovered => "discovered",
            ItemState::Matched => "matched",
            ItemState::Unmatched => "unmatched",
            ItemState::Resolved => "resolved",
            ItemState::Unresolved => "unresolved",
            ItemState::Written => "written",
            ItemState::Failed => "failed",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the variants of a written item were made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// The matched photograph.
    Photograph,
    /// Placeholder art, because no file matched the identifier.
    Placeholder,
    /// Placeholder art, because the matched file could not be used.
    Fallback {
        /// Why the photograph was rejected.
        reason: String,
    },
}

impl SourceKind {
    /// Whether the variants are synthetic.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, SourceKind::Photograph)
    }
}

/// The result of processing one input file or one unmatched catalog identifier.
#[derive(Debug)]
pub struct ItemOutcome {
    /// The input file, or `None` for an identifier no file matched.
    pub input: Option<PathBuf>,
    /// The identifier, once matched.
    pub identifier: Option<AssetIdentifier>,
    /// The final state.
    pub state: ItemState,
    /// Where the variants came from, once resolved.
    pub source: Option<SourceKind>,
    /// Files written for this item, relative to the output root, manifest last.
    pub written: Vec<PathBuf>,
    /// The error behind an `Unmatched`, `Unresolved` or `Failed` state.
    pub error: Option<PipelineError>,
}

impl ItemOutcome {
    pub(super) fn for_input(path: &Path) -> Self {
        Self::new(Some(path.to_path_buf()), None)
    }

    pub(super) fn for_identifier(identifier: &AssetIdentifier) -> Self {
        let mut outcome = Self::new(None, Some(identifier.clone()));
        outcome.advance(ItemState::Matched);
        outcome
    }

    fn new(input: Option<PathBuf>, identifier: Option<AssetIdentifier>) -> Self {
        Self {
            input,
            identifier,
            state: ItemState::Discovered,
            source: None,
            written: Vec::new(),
            error: None,
        }
    }

    /// Moves to `next`. Edges outside the state machine are a bug in the agent.
    pub(super) fn advance(&mut self, next: ItemState) {
        debug_assert!(
            self.state.can_transition(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        log::trace!("[{}] {} -> {}", self.label(), self.state, next);
        self.state = next;
    }

    /// Moves to a terminal state carrying `error`.
    pub(super) fn finish_with(&mut self, next: ItemState, error: PipelineError) {
        self.advance(next);
        self.error = Some(error);
    }

    /// The input file name, or the identifier for synthesized items.
    pub fn label(&self) -> String {
        match (&self.input, &self.identifier) {
            (Some(path), _) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            (None, Some(id)) => id.to_string(),
            (None, None) => "<unknown>".to_string(),
        }
    }
}

/// Everything a pass did, in processing order.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// One outcome per input file (sorted by path), then one per unmatched identifier.
    pub outcomes: Vec<ItemOutcome>,
    /// The valid identifiers, in catalog order, to show next to unmatched files.
    pub guidance: Vec<AssetIdentifier>,
}

impl PipelineReport {
    fn count(&self, state: ItemState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    /// Items whose manifest was written.
    pub fn written(&self) -> usize {
        self.count(ItemState::Written)
    }

    /// Input files that matched nothing.
    pub fn unmatched(&self) -> usize {
        self.count(ItemState::Unmatched)
    }

    /// Items that failed.
    pub fn failed(&self) -> usize {
        self.count(ItemState::Failed)
    }

    /// Identifiers left without variants.
    pub fn unresolved(&self) -> usize {
        self.count(ItemState::Unresolved)
    }

    /// Written items whose art is synthetic.
    pub fn placeholders(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == ItemState::Written)
            .filter(|o| o.source.as_ref().is_some_and(SourceKind::is_placeholder))
            .count()
    }

    /// File names of the unmatched inputs.
    pub fn unmatched_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.state == ItemState::Unmatched)
            .filter_map(|o| o.input.as_deref())
            .collect()
    }

    /// Identifiers left unresolved.
    pub fn unresolved_identifiers(&self) -> Vec<&AssetIdentifier> {
        self.outcomes
            .iter()
            .filter(|o| o.state == ItemState::Unresolved)
            .filter_map(|o| o.identifier.as_ref())
            .collect()
    }

    /// Failed items with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&ItemOutcome, &PipelineError)> {
        self.outcomes
            .iter()
            .filter(|o| o.state == ItemState::Failed)
            .filter_map(|o| o.error.as_ref().map(|e| (o, e)))
    }

    /// The written outcome for `identifier`, if any.
    pub fn written_for(&self, identifier: &AssetIdentifier) -> Option<&ItemOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.state == ItemState::Written && o.identifier.as_ref() == Some(identifier))
    }

    /// `true` when no item failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}
