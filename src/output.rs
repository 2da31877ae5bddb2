//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and title; source paths,
//! dates and status are indented context lines underneath. The output reads
//! as a content inventory while still letting users trace items back to
//! their files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Artigos (5 items, 4 visible)
//!     001 Guia completo
//!         Source: artigos/guia.md
//!         Date: 01 de fevereiro de 2024
//!         Category: guia
//!     002 Rascunho [draft]
//!         Source: artigos/rascunho.md
//!
//! Config
//!     config.toml
//!     sections.config.json (off: videos)
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Artigos → artigos/index.html
//!     001 Guia completo → artigos/guia/index.html
//! Categories
//!     001 guia → artigos/categoria/guia/index.html
//!
//! Generated 4 articles, 1 project, 1 case study (12 pages)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::config::{SECTIONS_FILE, SectionConfig};
use crate::content::{ContentItem, ContentKind};
use crate::format::format_date_br;
use crate::generate::{GenerateReport, PageKind};
use crate::scan::Manifest;
use crate::visibility::is_visible;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Status marker for items that will not be published.
fn status_marker(item: &ContentItem) -> &'static str {
    if item.draft.is_true() {
        " [draft]"
    } else if item.visible.is_false() {
        " [hidden]"
    } else {
        ""
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Header line plus context lines for one item.
fn item_lines(index: usize, item: &ContentItem, depth: usize) -> Vec<String> {
    let base = indent(depth);
    let mut lines = vec![format!(
        "{}{} {}{}",
        base,
        format_index(index),
        item.title,
        status_marker(item)
    )];
    lines.push(format!("{}    Source: {}", base, item.source_path));
    let date = format_date_br(item.date);
    if !date.is_empty() {
        lines.push(format!("{}    Date: {}", base, date));
    }
    let tags = item.category.tags();
    if !tags.is_empty() {
        lines.push(format!("{}    Category: {}", base, tags.join(", ")));
    }
    lines
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan output: every parsed item per collection, hidden ones marked.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for kind in ContentKind::ALL {
        let items = manifest.items(kind);
        let visible = items.iter().filter(|i| is_visible(i)).count();
        lines.push(format!(
            "{} ({}, {} visible)",
            kind.label(),
            plural(items.len(), "item", "items"),
            visible
        ));
        for (i, item) in items.iter().enumerate() {
            lines.extend(item_lines(i + 1, item, 1));
        }
        lines.push(String::new());
    }

    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join(SECTIONS_FILE).exists() {
        let off: Vec<&str> = SectionConfig::NAMES
            .into_iter()
            .filter(|name| !manifest.sections.is_enabled(name))
            .collect();
        if off.is_empty() {
            lines.push(format!("    {SECTIONS_FILE}"));
        } else {
            lines.push(format!("    {SECTIONS_FILE} (off: {})", off.join(", ")));
        }
    }
    for name in manifest.partials.keys() {
        lines.push(format!("    sections/{name}.md"));
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate output: one line per written page, grouped like the site.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut categories = Vec::new();
    let mut position = 0;

    for page in &report.pages {
        match page.kind {
            PageKind::Item(_) => {
                position += 1;
                lines.push(format!(
                    "    {} {} → {}",
                    format_index(position),
                    page.title,
                    page.path
                ));
            }
            PageKind::Home => lines.push(format!("Home → {}", page.path)),
            PageKind::Category => categories.push(page),
            PageKind::Listing(_) => {
                position = 0;
                lines.push(format!("{} → {}", page.title, page.path));
            }
        }
    }

    if !categories.is_empty() {
        lines.push("Categories".to_string());
        for (i, page) in categories.iter().enumerate() {
            lines.push(format!(
                "    {} {} → {}",
                format_index(i + 1),
                page.title,
                page.path
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {} ({})",
        plural(report.item_pages(ContentKind::Articles), "article", "articles"),
        plural(report.item_pages(ContentKind::Projects), "project", "projects"),
        plural(
            report.item_pages(ContentKind::CaseStudies),
            "case study",
            "case studies"
        ),
        plural(report.pages.len(), "page", "pages"),
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Search output
// ============================================================================

pub fn format_search_results(items: &[&ContentItem]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No matching items".to_string()];
    }
    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let mut entry = item_lines(i + 1, item, 0);
        entry[0].push_str(&format!(" ({})", item.kind.label()));
        entry.insert(1, format!("    URL: {}", item.url));
        lines.extend(entry);
    }
    lines
}

pub fn print_search_results(items: &[&ContentItem]) {
    for line in format_search_results(items) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
