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

//! Acts as the **[A]gent** for one ingestion pass over a directory of photographs.
//!
//! For each discovered file the agent runs the matching lane, decodes the
//! photograph, derives its variants (or synthesizes placeholder art), writes
//! the variants and finally the manifest. Every item ends in a terminal
//! [`ItemState`]; a failing item never stops the batch.
//!
//! Catalog identifiers that no file matched are handled after the inputs, so
//! the outcome of a pass is the same whatever order the files were given in.

mod agent;
mod config;
mod discovery;
mod metrics;
mod outcome;

pub use agent::PipelineAgent;
pub use config::PipelineConfig;
pub use discovery::discover_inputs;
pub use outcome::{ItemOutcome, ItemState, PipelineReport, SourceKind};
