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

pub fn list(config: &PlatterConfig) -> Result<()> {
    print_task_start("Catalog", BOOK, CYAN);
    let catalog = config.catalog()?;

    let width = catalog
        .iter()
        .map(|entry| entry.id.as_str().len())
        .max()
        .unwrap_or(0);

    let mut group = "";
    for entry in catalog.iter() {
        if entry.group != group {
            group = entry.group.as_str();
            println!("\n{}{}{}{}", BOLD, BLUE, group, RESET);
        }
        let scales: Vec<&str> = entry.scales.iter().map(|scale| scale.as_str()).collect();
        println!(
            "   {:<width$}  {:<10}  {:>9}  {}",
            entry.id.as_str(),
            scales.join(","),
            entry.size.to_string(),
            entry.display_title(),
            width = width
        );
    }

    print_success(&format!("{} identifier(s)", catalog.len()));
    Ok(())
}
