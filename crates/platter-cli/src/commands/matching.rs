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

use crate::commands::config::PlatterConfig;
use crate::helpers::*;
use anyhow::Result;
use platter_lanes::{MatchResult, NameMatcher};
use std::sync::Arc;

/// Matches each name without touching the filesystem. Returns `Ok(false)` if any name misses.
pub fn match_names(config: &PlatterConfig, filenames: &[String]) -> Result<bool> {
    print_task_start("Matching Names", MAGNIFIER, CYAN);
    let matcher = NameMatcher::new(Arc::new(config.catalog()?));

    let mut all_matched = true;
    for filename in filenames {
        match matcher.match_name(filename) {
            MatchResult::Matched(id) => print_success(&format!("{} -> {}", filename, id)),
            MatchResult::NoMatch { normalized } => {
                all_matched = false;
                print_warning(&format!(
                    "{} -> no match (normalized to '{}')",
                    filename, normalized
                ));
            }
        }
    }

    if !all_matched {
        println!("\n{}Valid identifiers:{}", BOLD, RESET);
        let ids: Vec<&str> = matcher.guidance().iter().map(|id| id.as_str()).collect();
        print_wrapped_list(&ids);
    }
    Ok(all_matched)
}
