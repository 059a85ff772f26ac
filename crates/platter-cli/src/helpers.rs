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

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const BLUE: &str = "\x1b[34m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

// Visual symbols
pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
pub const WARN: &str = "⚠";
pub const PLATE: &str = "🍽";
pub const CAMERA: &str = "📷";
pub const MAGNIFIER: &str = "🔍";
pub const BOOK: &str = "📖";

pub fn print_task_start(task_name: &str, emoji: &str, color: &str) {
    println!(
        "\n{}{}━━━ {} {} {}━━━{}",
        BOLD, color, emoji, task_name, emoji, RESET
    );
}

pub fn print_success(message: &str) {
    println!("{}{} {} {}{}", BOLD, GREEN, CHECK, message, RESET);
}

pub fn print_warning(message: &str) {
    println!("{}{} {} {}{}", BOLD, YELLOW, WARN, message, RESET);
}

pub fn print_error(message: &str) {
    eprintln!("{}{} {} {}{}", BOLD, RED, CROSS, message, RESET);
}

pub fn print_info(message: &str) {
    println!("{}💡 Info:{} {}", BOLD, RESET, message);
}

/// Prints `items` as an indented, comma-separated block wrapped near 80 columns.
pub fn print_wrapped_list<T: AsRef<str>>(items: &[T]) {
    let mut line = String::from("   ");
    for (i, item) in items.iter().enumerate() {
        let item = item.as_ref();
        let separator = if i + 1 < items.len() { ", " } else { "" };
        if line.len() + item.len() + separator.len() > 80 && !line.trim().is_empty() {
            println!("{}", line.trim_end());
            line = String::from("   ");
        }
        line.push_str(item);
        line.push_str(separator);
    }
    if !line.trim().is_empty() {
        println!("{}", line.trim_end());
    }
}
