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

//! # Platter Agents
//!
//! Agents own the decisions of a pass: which file sources which identifier,
//! when to fall back to placeholder art, and what counts as done. The actual
//! work is delegated to the lanes in `platter-lanes`.

#![warn(missing_docs)]

pub mod pipeline_agent;

pub use pipeline_agent::{
    discover_inputs, ItemOutcome, ItemState, PipelineAgent, PipelineConfig, PipelineReport,
    SourceKind,
};
