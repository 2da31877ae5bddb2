//! Site configuration.
//!
//! Two files at the content root drive a build:
//!
//! - `config.toml`: site identity, collection directories, home page limits.
//!   Sparse overrides merged on top of stock defaults; unknown keys are
//!   rejected to catch typos early.
//! - `sections.config.json`: which home page sections are rendered. This file
//!   is never fatal: if it is missing or broken, every section is enabled.
//!
//! Both are loaded once per build and handed to the stages by value.
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "My Portfolio"
//! description = ""
//! url = ""
//! language = "pt-BR"
//!
//! [author]
//! name = ""
//! email = ""
//!
//! [social]                  # label → URL, rendered in the contact section
//! linkedin = "https://linkedin.com/in/someone"
//!
//! [collections]             # source directories, relative to the content root
//! articles = "artigos"
//! projects = "projetos"
//! case_studies = "casos"
//!
//! [home]                    # how many items each home page section shows
//! articles = 6
//! projects = 3
//! case_studies = 3
//! ```

use crate::content::ContentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, used in `<title>` and the hero section.
    pub title: String,
    /// One-line description for the hero section and meta tags.
    pub description: String,
    /// Canonical base URL of the published site.
    pub url: String,
    /// `lang` attribute of every page.
    pub language: String,
    pub author: AuthorConfig,
    /// Social profile links, label → URL.
    pub social: BTreeMap<String, String>,
    pub collections: CollectionsConfig,
    pub home: HomeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Portfolio".to_string(),
            description: String::new(),
            url: String::new(),
            language: "pt-BR".to_string(),
            author: AuthorConfig::default(),
            social: BTreeMap::new(),
            collections: CollectionsConfig::default(),
            home: HomeConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        let dirs: Vec<&str> = ContentKind::ALL
            .iter()
            .map(|&kind| self.collections.dir(kind))
            .collect();
        if dirs.iter().any(|d| d.trim_matches('/').is_empty()) {
            return Err(ConfigError::Validation(
                "collections directories must not be empty".into(),
            ));
        }
        for (i, dir) in dirs.iter().enumerate() {
            if dirs[..i].contains(dir) {
                return Err(ConfigError::Validation(format!(
                    "collections directory \"{dir}\" is used more than once"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
}

/// Source directory of each collection, relative to the content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionsConfig {
    pub articles: String,
    pub projects: String,
    pub case_studies: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            articles: "artigos".to_string(),
            projects: "projetos".to_string(),
            case_studies: "casos".to_string(),
        }
    }
}

impl CollectionsConfig {
    pub fn dir(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Articles => &self.articles,
            ContentKind::Projects => &self.projects,
            ContentKind::CaseStudies => &self.case_studies,
        }
    }
}

/// Number of items each home page section shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    pub articles: usize,
    pub projects: usize,
    pub case_studies: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            articles: 6,
            projects: 3,
            case_studies: 3,
        }
    }
}

impl HomeConfig {
    pub fn limit(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::Articles => self.articles,
            ContentKind::Projects => self.projects,
            ContentKind::CaseStudies => self.case_studies,
        }
    }
}

// =============================================================================
// config.toml loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if there is no `config.toml`.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults, and validate it.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Site title, shown in the browser tab and the hero section.
title = "My Portfolio"

# One-line description for the hero section and <meta name="description">.
description = ""

# Canonical base URL of the published site, e.g. "https://example.com".
url = ""

# Language of the content (the `lang` attribute of every page).
language = "pt-BR"

[author]
name = ""
email = ""

# ---------------------------------------------------------------------------
# Social links (label = URL), listed in the contact section.
# ---------------------------------------------------------------------------
[social]
# linkedin = "https://linkedin.com/in/someone"
# youtube = "https://youtube.com/@someone"

# ---------------------------------------------------------------------------
# Content collections: source directory of each, relative to the content root.
# Every *.md file below a directory (recursively) becomes one item.
# ---------------------------------------------------------------------------
[collections]
articles = "artigos"
projects = "projetos"
case_studies = "casos"

# ---------------------------------------------------------------------------
# Home page: how many of the newest items each section shows.
# ---------------------------------------------------------------------------
[home]
articles = 6
projects = 3
case_studies = 3
"##
}

// =============================================================================
// sections.config.json
// =============================================================================

pub const SECTIONS_FILE: &str = "sections.config.json";

/// Home page sections that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub hero: bool,
    pub sobre: bool,
    pub modalidades: bool,
    pub casos: bool,
    pub projetos: bool,
    pub videos: bool,
    pub artigos: bool,
    pub contato: bool,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            hero: true,
            sobre: true,
            modalidades: true,
            casos: true,
            projetos: true,
            videos: true,
            artigos: true,
            contato: true,
        }
    }
}

impl SectionConfig {
    /// Section names in page order.
    pub const NAMES: [&'static str; 8] = [
        "hero",
        "sobre",
        "modalidades",
        "casos",
        "projetos",
        "videos",
        "artigos",
        "contato",
    ];

    fn slot_mut(&mut self, name: &str) -> Option<&mut bool> {
        match name {
            "hero" => Some(&mut self.hero),
            "sobre" => Some(&mut self.sobre),
            "modalidades" => Some(&mut self.modalidades),
            "casos" => Some(&mut self.casos),
            "projetos" => Some(&mut self.projetos),
            "videos" => Some(&mut self.videos),
            "artigos" => Some(&mut self.artigos),
            "contato" => Some(&mut self.contato),
            _ => None,
        }
    }

    /// Unknown section names are never enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            "hero" => self.hero,
            "sobre" => self.sobre,
            "modalidades" => self.modalidades,
            "casos" => self.casos,
            "projetos" => self.projetos,
            "videos" => self.videos,
            "artigos" => self.artigos,
            "contato" => self.contato,
            _ => false,
        }
    }

    /// Apply a parsed JSON document on top of these values.
    ///
    /// Accepts `{ "sections": { ... } }` or a flat object. Unknown keys are
    /// ignored, non-boolean values leave the current value in place, and
    /// anything that is not an object changes nothing.
    pub fn overlay(mut self, document: &Value) -> Self {
        let Some(object) = document.as_object() else {
            tracing::warn!("{SECTIONS_FILE} is not a JSON object; all sections enabled");
            return self;
        };
        let table = match object.get("sections") {
            Some(Value::Object(inner)) => inner,
            _ => object,
        };
        for (name, value) in table {
            let Some(slot) = self.slot_mut(name) else {
                continue;
            };
            match value.as_bool() {
                Some(enabled) => *slot = enabled,
                None => tracing::warn!(
                    "{SECTIONS_FILE}: \"{name}\" should be true or false, found {value}"
                ),
            }
        }
        self
    }
}

/// Load `sections.config.json` from the content root.
///
/// Never fails: any problem falls back to all sections enabled.
pub fn load_sections(root: &Path) -> SectionConfig {
    let path = root.join(SECTIONS_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("no {SECTIONS_FILE}; all sections enabled");
            return SectionConfig::default();
        }
        Err(e) => {
            tracing::warn!("reading {}: {}; all sections enabled", path.display(), e);
            return SectionConfig::default();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(document) => SectionConfig::default().overlay(&document),
        Err(e) => {
            tracing::warn!("parsing {}: {}; all sections enabled", path.display(), e);
            SectionConfig::default()
        }
    }
}
