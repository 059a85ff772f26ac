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
use platter_lanes::is_supported;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the raster files at the top level of `dir`, sorted by path.
///
/// Subdirectories are not descended into and files with an extension outside
/// the supported list are skipped.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Input directory '{}' does not exist", dir.display());
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Failed to read input directory '{}'", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if is_supported(&path) {
            inputs.push(path);
        } else {
            log::debug!("Skipping unsupported file '{}'", path.display());
        }
    }

    inputs.sort();
    log::debug!("Discovered {} input file(s) in '{}'", inputs.len(), dir.display());
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discovery_filters_and_sorts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("tuna_steak.jpeg"), b"")?;
        fs::write(dir.path().join("Greek_Salad.JPG"), b"")?;
        fs::write(dir.path().join("notes.txt"), b"")?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("salmon_bowl.png"), b"")?;

        let found = discover_inputs(dir.path())?;
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["Greek_Salad.JPG", "tuna_steak.jpeg"]);
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(discover_inputs(Path::new("/definitely/not/here")).is_err());
    }
}
