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

use platter_lanes::{FontChain, OutputFormat};
use std::path::PathBuf;

/// Construction-time settings of a [`PipelineAgent`](super::PipelineAgent).
///
/// The output root has no default; every pass writes exactly where it is told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory the asset catalog is written into.
    pub output_root: PathBuf,
    /// Whether catalog identifiers with no usable photograph get placeholder art.
    pub synthesize_missing: bool,
    /// Encoding of every variant file.
    pub output_format: OutputFormat,
    /// Fonts tried, in order, for placeholder text.
    pub fonts: FontChain,
}

impl PipelineConfig {
    /// PNG output, placeholder synthesis on, and the OS font candidates.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            synthesize_missing: true,
            output_format: OutputFormat::Png,
            fonts: FontChain::system_defaults(),
        }
    }

    /// Turns placeholder synthesis on or off.
    pub fn with_synthesize_missing(mut self, synthesize: bool) -> Self {
        self.synthesize_missing = synthesize;
        self
    }

    /// Sets the variant file format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Replaces the font chain.
    pub fn with_fonts(mut self, fonts: FontChain) -> Self {
        self.fonts = fonts;
        self
    }
}
