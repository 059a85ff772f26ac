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

//! Persists artifacts under an output root on the local filesystem.

use platter_core::ArtifactStore;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// An [`ArtifactStore`] that writes files relative to a root directory.
///
/// Every write is a full replace: the bytes go to a hidden temporary sibling
/// which is then renamed over the target, so readers never see a half-written
/// file.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Creates a new `FileSystemStore` rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, relative_path: &Path) -> io::Result<PathBuf> {
        let escapes = relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative_path.file_name().is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a path inside the output root", relative_path.display()),
            ));
        }
        Ok(self.root.join(relative_path))
    }
}

impl ArtifactStore for FileSystemStore {
    fn write(&self, relative_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let target = self.target(relative_path)?;
        let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty artifact path"));
        };
        fs::create_dir_all(parent)?;

        let staging = parent.join(format!(".{}.tmp", name.to_string_lossy()));
        fs::write(&staging, bytes)?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        log::trace!("Wrote {} bytes to '{}'", bytes.len(), target.display());
        Ok(())
    }
}
