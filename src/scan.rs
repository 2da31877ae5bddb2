//! Content scanning and manifest generation.
//!
//! Stage 1 of the build pipeline. Walks the content directory and parses every
//! markdown file of every collection into a [`ContentItem`], producing a
//! [`Manifest`] that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml              # Site configuration (optional)
//! ├── sections.config.json     # Home page section toggles (optional)
//! ├── sections/                # Markdown partials for home page sections
//! │   ├── sobre.md
//! │   └── contato.md
//! ├── artigos/                 # Articles
//! │   ├── guia.md
//! │   └── 2023/antigo.md       # Nested directories are fine
//! ├── projetos/                # Projects
//! │   └── site.md
//! └── casos/                   # Case studies
//!     └── loja.md
//! ```
//!
//! Collection directory names come from `[collections]` in `config.toml`.
//! A missing collection directory is an empty collection, not an error.
//!
//! ## Output
//!
//! The manifest keeps **every** parsed item, hidden ones included, in file-name
//! order. Visibility and ordering are applied when collections are built, so
//! `check` can still report drafts and hidden items.

use crate::collections::deserialize_lenient;
use crate::config::{self, SectionConfig, SiteConfig};
use crate::content::{self, ContentItem, ContentKind, FrontMatterError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Front matter error in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Directory holding markdown partials for home page sections.
pub const PARTIALS_DIR: &str = "sections";

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub articles: Vec<ContentItem>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub projects: Vec<ContentItem>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub case_studies: Vec<ContentItem>,
    /// Section name → markdown, from `sections/<name>.md`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub partials: BTreeMap<String, String>,
    #[serde(default)]
    pub config: SiteConfig,
    #[serde(default)]
    pub sections: SectionConfig,
}

impl Manifest {
    pub fn items(&self, kind: ContentKind) -> &[ContentItem] {
        match kind {
            ContentKind::Articles => &self.articles,
            ContentKind::Projects => &self.projects,
            ContentKind::CaseStudies => &self.case_studies,
        }
    }

    fn items_mut(&mut self, kind: ContentKind) -> &mut Vec<ContentItem> {
        match kind {
            ContentKind::Articles => &mut self.articles,
            ContentKind::Projects => &mut self.projects,
            ContentKind::CaseStudies => &mut self.case_studies,
        }
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let sections = config::load_sections(root);
    let partials = scan_partials(root)?;

    let mut manifest = Manifest {
        articles: Vec::new(),
        projects: Vec::new(),
        case_studies: Vec::new(),
        partials,
        config,
        sections,
    };

    for kind in ContentKind::ALL {
        let dir = manifest.config.collections.dir(kind).to_string();
        *manifest.items_mut(kind) = scan_collection(root, &dir, kind)?;
    }

    Ok(manifest)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Parse every `*.md` below `root/dir`, in file-name order.
fn scan_collection(
    root: &Path,
    dir: &str,
    kind: ContentKind,
) -> Result<Vec<ContentItem>, ScanError> {
    let base = root.join(dir);
    if !base.is_dir() {
        tracing::debug!("{} not found; {:?} is empty", base.display(), kind);
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let walker = WalkDir::new(&base)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let path = entry.path();
        let rel_path = path
            .strip_prefix(&base)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let text = fs::read_to_string(path)?;
        let item = content::parse_item(kind, dir, &rel_path, &text).map_err(|source| {
            ScanError::FrontMatter {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!("parsed {} → {}", item.source_path, item.url);
        items.push(item);
    }

    Ok(items)
}

/// Read `sections/<name>.md` for every known home page section.
fn scan_partials(root: &Path) -> Result<BTreeMap<String, String>, ScanError> {
    let dir = root.join(PARTIALS_DIR);
    let mut partials = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(partials);
    }
    for name in SectionConfig::NAMES {
        let path = dir.join(format!("{name}.md"));
        if path.is_file() {
            partials.insert(name.to_string(), fs::read_to_string(&path)?);
        }
    }
    Ok(partials)
}
