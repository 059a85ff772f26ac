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

//! Defines the abstraction for persisting variant files and manifests.

use std::io;
use std::path::Path;

/// A destination for pipeline output, addressed by paths relative to an output root.
///
/// Every write is a full replace of the target: after a successful call the
/// file holds exactly `bytes`, never a mix of old and new content.
pub trait ArtifactStore: Send + Sync {
    /// Replaces the file at `relative_path` with `bytes`, creating parent
    /// directories as needed.
    fn write(&self, relative_path: &Path, bytes: &[u8]) -> io::Result<()>;
}
