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

use crate::helpers::*;
use anyhow::{Context, Result};
use platter_agents::PipelineConfig;
use platter_core::{CatalogEntry, CatalogRegistry};
use platter_lanes::{FontChain, FontSource, OutputFormat};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "Platter.toml";

/// Represents the structure of the `Platter.toml` file.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct PlatterConfig {
    /// Directory scanned for photographs.
    pub input_dir: Option<PathBuf>,
    /// Root of the generated asset catalog.
    pub output_root: Option<PathBuf>,
    /// Whether identifiers without a photograph get placeholder art.
    #[serde(default = "default_synthesize")]
    pub synthesize_missing: bool,
    /// Variant file format.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Placeholder fonts.
    #[serde(default)]
    pub fonts: FontsConfig,
    /// Replaces the built-in catalog when present.
    #[serde(default)]
    pub catalog: Option<Vec<CatalogEntry>>,
}

fn default_synthesize() -> bool {
    true
}

impl Default for PlatterConfig {
    /// Used when no `Platter.toml` exists: no paths, placeholders on, PNG output.
    fn default() -> Self {
        Self {
            input_dir: None,
            output_root: None,
            synthesize_missing: default_synthesize(),
            output_format: OutputFormat::default(),
            fonts: FontsConfig::default(),
            catalog: None,
        }
    }
}

/// The `[fonts]` table.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FontsConfig {
    /// Tried before every other font.
    pub preferred: Option<PathBuf>,
    /// Replaces the OS-bundled candidates when present.
    pub system: Option<Vec<PathBuf>>,
}

/// Values given on the command line. They win over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub no_placeholders: bool,
}

impl PlatterConfig {
    /// Parses a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<CatalogRegistry> {
        match &self.catalog {
            Some(entries) => CatalogRegistry::new(entries.clone())
                .context("The [[catalog]] entries in the configuration are invalid"),
            None => Ok(CatalogRegistry::builtin()),
        }
    }

    /// The font chain: preferred file first, then the system candidates.
    pub fn font_chain(&self) -> FontChain {
        let mut chain = match &self.fonts.system {
            Some(paths) => FontChain::new(paths.iter().cloned().map(FontSource::File).collect()),
            None => FontChain::system_defaults(),
        };
        if let Some(preferred) = &self.fonts.preferred {
            chain = chain.with_preferred(preferred);
        }
        chain
    }

    /// The input directory after overrides.
    pub fn input_dir(&self, overrides: &Overrides) -> Result<PathBuf> {
        overrides
            .input
            .clone()
            .or_else(|| self.input_dir.clone())
            .context("No input directory: pass --input or set `input_dir` in Platter.toml")
    }

    /// Builds the agent configuration. Fails when no output root is given anywhere.
    pub fn pipeline_config(&self, overrides: &Overrides) -> Result<PipelineConfig> {
        let output_root = overrides
            .output
            .clone()
            .or_else(|| self.output_root.clone())
            .context("No output root: pass --output or set `output_root` in Platter.toml")?;

        Ok(PipelineConfig::new(output_root)
            .with_synthesize_missing(self.synthesize_missing && !overrides.no_placeholders)
            .with_output_format(self.output_format)
            .with_fonts(self.font_chain()))
    }
}

/// Loads the configuration file.
///
/// An explicit `path` must exist. Without one, `Platter.toml` in the working
/// directory is used if present, and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<PlatterConfig> {
    let (config_path, explicit) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };

    if !explicit && !config_path.exists() {
        log::debug!("No '{}' found, using defaults", config_path.display());
        return Ok(PlatterConfig::default());
    }

    print_info(&format!(
        "Found '{}'. Loading configuration.",
        config_path.display()
    ));
    let text = fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read configuration file at '{}'",
            config_path.display()
        )
    })?;
    PlatterConfig::parse(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", config_path.display()))
}
