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

//! Process-wide logger setup.

use env_logger::{Builder, Env};

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` always wins. Without it the filter defaults to `info`, or to
/// `debug` when `verbose` is set. Image codec crates are held at `warn` so
/// their chatter does not drown out pipeline output.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let result = Builder::from_env(Env::default().default_filter_or(default_filter))
        .filter_module("png", log::LevelFilter::Warn)
        .filter_module("jpeg_decoder", log::LevelFilter::Warn)
        .format_timestamp(None)
        .try_init();

    if result.is_err() {
        log::trace!("Logger already initialized, keeping the existing one");
    }
}
