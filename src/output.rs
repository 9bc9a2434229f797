//! CLI output formatting for `build` and `check`.
//!
//! Output is shell-centric: each source shell is one entry, headed by its
//! positional index and path, with kind and data status alongside and the
//! files it produced as indented `→` lines.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 gardening.html (gardening: 2 categories, 3 plants)
//!     → gardening.html
//!     → gardening-category-1.html
//!     → gardening-plant-1.html
//! 002 index.html
//!     → index.html
//!
//! Assets
//!     plants-data.json
//!
//! Generated 2 shells, 4 pages, 1 asset
//! ```
//!
//! ## Check
//!
//! ```text
//! Shells
//! 001 gardening.html (gardening)
//!     Mounts: kt-nav, kt-footer, category-filter, plants-grid, modal-body
//!     Data: 2 categories, 3 plants
//! ```
//!
//! Each command has a `format_*` function returning lines, for testing,
//! and a `print_*` wrapper that writes them to stdout.

use crate::generate::{BuildReport, DataStatus, PageKind, ShellCheck};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Shell header: index, path, and kind/data detail for data-driven pages.
///
/// ```text
/// 001 gardening.html (gardening: 2 categories, 3 plants)
/// 002 photography.html (photography: load failed)
/// 003 index.html
/// ```
fn shell_header(index: usize, source: &str, kind: PageKind, data: &DataStatus) -> String {
    let detail = match data {
        DataStatus::NotNeeded => None,
        DataStatus::Ready(summary) => Some(format!("{kind}: {summary}")),
        DataStatus::Failed(_) => Some(format!("{kind}: load failed")),
    };
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), source, d),
        None => format!("{} {}", format_index(index), source),
    }
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];

    for (i, shell) in report.shells.iter().enumerate() {
        lines.push(shell_header(i + 1, &shell.source, shell.kind, &shell.data));
        if let DataStatus::Failed(err) = &shell.data {
            lines.push(format!("{}Error: {}", indent(1), err));
        }
        for file in &shell.files {
            lines.push(format!("{}\u{2192} {}", indent(1), file));
        }
    }

    if !report.assets.is_empty() {
        lines.push(String::new());
        lines.push("Assets".to_string());
        for asset in &report.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.shells.len(), "shell", "shells"),
        plural(report.page_count(), "page", "pages"),
        plural(report.assets.len(), "asset", "assets"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

pub fn format_check_output(checks: &[ShellCheck]) -> Vec<String> {
    let mut lines = vec!["Shells".to_string()];
    for (i, check) in checks.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            check.source,
            check.kind
        ));
        let mounts = if check.mounts.is_empty() {
            "none".to_string()
        } else {
            check.mounts.join(", ")
        };
        lines.push(format!("{}Mounts: {}", indent(1), mounts));
        match &check.data {
            DataStatus::NotNeeded => {}
            DataStatus::Ready(summary) => lines.push(format!("{}Data: {}", indent(1), summary)),
            DataStatus::Failed(err) => lines.push(format!("{}Data: FAILED {}", indent(1), err)),
        }
    }
    lines
}

pub fn print_check_output(checks: &[ShellCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}

/// True when every data-driven shell loaded its document.
pub fn all_data_ready(checks: &[ShellCheck]) -> bool {
    checks
        .iter()
        .all(|c| !matches!(c.data, DataStatus::Failed(_)))
}
