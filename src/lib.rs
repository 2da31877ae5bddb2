//! # Folio
//!
//! A small static site generator for personal portfolio sites. Content is
//! three collections of markdown files (articles, projects, case studies)
//! with YAML front matter; the output is plain HTML.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (files → typed items)
//! 2. Generate  manifest  →  dist/            (collections → HTML)
//! ```
//!
//! The manifest is human-readable JSON, so a build can be inspected between
//! stages. It keeps every parsed item, drafts included; the public
//! collections are built from it fresh on every generate run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Typed content model and front-matter ingestion |
//! | [`visibility`] | Which items may be published (`draft`, `visible`) |
//! | [`collections`] | Sorted and categorized collections, search and filter predicates |
//! | [`scan`] | Stage 1: walks the collection directories, produces the manifest |
//! | [`generate`] | Stage 2: renders the site with Maud |
//! | [`config`] | `config.toml` loading and validation, section toggles |
//! | [`format`] | Date display helpers |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Normalize Once
//!
//! Front matter is written by hand and is loosely typed: `draft: "TRUE"`,
//! `visible: no`, `category: guia` next to `category: [guia, dev]`. All of it
//! is normalized at ingestion into [`content::Flag`] and
//! [`content::Category`]. Collection code matches on enums and never parses
//! text.
//!
//! ## Never Fail a Build Over One Item
//!
//! A bad date sorts the item last, a broken `sections.config.json` enables
//! every section, and a malformed collection in the manifest renders as an
//! empty one. These are logged with `tracing` and the build goes on. Errors
//! that mean the author must fix something (invalid `config.toml`, a file
//! with no front matter or no title) still stop the build.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are
//! checked at compile time and every interpolation is escaped.

pub mod collections;
pub mod config;
pub mod content;
pub mod format;
pub mod generate;
pub mod output;
pub mod scan;
pub mod visibility;

#[cfg(test)]
pub(crate) mod test_helpers;
