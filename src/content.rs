//! Typed content model and front-matter ingestion.
//!
//! Every article, project, and case study is a markdown file that starts with
//! a YAML front-matter block:
//!
//! ```text
//! ---
//! title: Guia completo
//! date: 2024-02-01
//! category: [guia, tutorial]
//! summary: Tudo o que você precisa saber
//! draft: false
//! visible: yes
//! cover: /assets/img/guia.png      # passthrough metadata
//! ---
//! Markdown body...
//! ```
//!
//! Portuguese field names (`data`, `categoria`, `resumo`, `visivel`) are
//! read as well. When a file carries both spellings of a field, the
//! Portuguese one wins: `date` is often left over from an older generator
//! while `data` is the value the site sorts by.
//!
//! ## Normalization
//!
//! Loosely-typed front matter is normalized exactly once, here, into
//! [`Flag`], [`Category`] and an optional [`NaiveDateTime`]. Nothing
//! downstream looks at raw YAML text again.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("file must begin with a `---` front-matter block closed by another `---` line")]
    Missing,
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The three content collections a portfolio site is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Articles,
    Projects,
    CaseStudies,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Articles,
        ContentKind::Projects,
        ContentKind::CaseStudies,
    ];

    /// Heading used for listing pages and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Articles => "Artigos",
            ContentKind::Projects => "Projetos",
            ContentKind::CaseStudies => "Casos",
        }
    }
}

/// A boolean-like front-matter flag (`draft`, `visible`).
///
/// Authors write these as YAML booleans or as text (`"no"`, `"hidden"`,
/// `" TRUE "`). Text is trimmed and compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Option<bool>")]
pub enum Flag {
    True,
    False,
    #[default]
    Unset,
}

const FALSY_WORDS: &[&str] = &["false", "0", "no", "off", "hidden"];

impl Flag {
    /// Normalize a raw front-matter value.
    ///
    /// - `true` / `"true"` → [`Flag::True`]
    /// - `false` / `"false"`, `"0"`, `"no"`, `"off"`, `"hidden"` → [`Flag::False`]
    /// - anything else, including numbers and absence → [`Flag::Unset`]
    pub fn from_value(value: &Value) -> Flag {
        match value {
            Value::Bool(true) => Flag::True,
            Value::Bool(false) => Flag::False,
            Value::String(text) => Flag::from_text(text),
            _ => Flag::Unset,
        }
    }

    pub fn from_text(text: &str) -> Flag {
        let normalized = text.trim().to_lowercase();
        if normalized == "true" {
            Flag::True
        } else if FALSY_WORDS.contains(&normalized.as_str()) {
            Flag::False
        } else {
            Flag::Unset
        }
    }

    pub fn is_true(self) -> bool {
        self == Flag::True
    }

    pub fn is_false(self) -> bool {
        self == Flag::False
    }
}

impl From<Value> for Flag {
    fn from(value: Value) -> Self {
        Flag::from_value(&value)
    }
}

impl From<Flag> for Option<bool> {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::True => Some(true),
            Flag::False => Some(false),
            Flag::Unset => None,
        }
    }
}

/// The category field of an item: one tag, a list of tags, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Category {
    Single(String),
    Multiple(Vec<String>),
    #[default]
    Absent,
}

impl Category {
    pub fn from_value(value: &Value) -> Category {
        match value {
            Value::Null => Category::Absent,
            Value::Array(values) => {
                Category::Multiple(values.iter().filter_map(scalar_text).collect())
            }
            Value::Object(_) => Category::Absent,
            scalar => scalar_text(scalar)
                .map(Category::Single)
                .unwrap_or(Category::Absent),
        }
    }

    /// Exact, case-sensitive membership. Single and list forms behave the same.
    pub fn contains(&self, target: &str) -> bool {
        match self {
            Category::Single(category) => category == target,
            Category::Multiple(categories) => categories.iter().any(|c| c == target),
            Category::Absent => false,
        }
    }

    /// All tags in declaration order.
    pub fn tags(&self) -> Vec<&str> {
        match self {
            Category::Single(category) => vec![category.as_str()],
            Category::Multiple(categories) => categories.iter().map(String::as_str).collect(),
            Category::Absent => Vec::new(),
        }
    }
}

impl From<Value> for Category {
    fn from(value: Value) -> Self {
        Category::from_value(&value)
    }
}

impl From<Category> for Value {
    fn from(category: Category) -> Self {
        match category {
            Category::Single(category) => Value::String(category),
            Category::Multiple(categories) => {
                Value::Array(categories.into_iter().map(Value::String).collect())
            }
            Category::Absent => Value::Null,
        }
    }
}

/// Text form of a scalar YAML/JSON value. Containers and null have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a front-matter date.
///
/// Accepts RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]`, and plain `YYYY-MM-DD`
/// (midnight). Offsets are dropped, keeping the wall-clock time the author
/// wrote. Returns `None` for anything else.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// One article, project, or case study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub kind: ContentKind,
    /// URL slug derived from the file stem
    pub slug: String,
    /// Site-relative URL of the item page, e.g. `/artigos/guia-completo/`
    pub url: String,
    /// Source path relative to the content root
    pub source_path: String,
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub draft: Flag,
    #[serde(default)]
    pub visible: Flag,
    /// Raw markdown body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Front-matter keys with no dedicated field, passed through untouched
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ContentItem {
    /// The date used for ordering. Missing or unparseable dates sort as the
    /// earliest possible moment.
    pub fn sort_date(&self) -> NaiveDateTime {
        self.date.unwrap_or(NaiveDateTime::MIN)
    }

    /// Text form of a passthrough field. Lists are joined with `,`.
    pub fn extra_text(&self, key: &str) -> Option<String> {
        match self.extra.get(key)? {
            Value::Array(values) => Some(
                values
                    .iter()
                    .filter_map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => scalar_text(other),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    category: Value,
    #[serde(default)]
    categoria: Value,
    #[serde(default)]
    summary: Value,
    #[serde(default)]
    resumo: Value,
    #[serde(default)]
    draft: Value,
    #[serde(default)]
    visible: Value,
    #[serde(default)]
    visivel: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// The Portuguese spelling of a field, falling back to the English one.
fn either(portuguese: Value, english: Value) -> Value {
    if portuguese.is_null() { english } else { portuguese }
}

/// Split a document into its YAML front matter and markdown body.
fn split_front_matter(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let rest = input.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Lowercase, keep alphanumerics, collapse everything else into single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug.to_string()
    }
}

/// Parse one source document into a [`ContentItem`].
///
/// `collection_dir` is the directory name of the collection (`artigos`) and
/// `rel_path` the file's path inside it (`2024/guia.md`); both feed the URL.
pub fn parse_item(
    kind: ContentKind,
    collection_dir: &str,
    rel_path: &str,
    input: &str,
) -> Result<ContentItem, FrontMatterError> {
    let (yaml, body) = split_front_matter(input).ok_or(FrontMatterError::Missing)?;
    let front: FrontMatter = serde_yaml::from_str(yaml)?;

    let mut segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    let file_name = segments.pop().unwrap_or_default();
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let slug = slugify(stem);

    let mut url = format!("/{}/", collection_dir.trim_matches('/'));
    for segment in segments {
        url.push_str(&slugify(segment));
        url.push('/');
    }
    url.push_str(&slug);
    url.push('/');

    let date_value = either(front.data, front.date);
    let category = either(front.categoria, front.category);
    let summary = either(front.resumo, front.summary);
    let visible = either(front.visivel, front.visible);

    let date = match scalar_text(&date_value) {
        Some(raw) => {
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                tracing::warn!(
                    "{}/{}: unparseable date {:?}, sorting as oldest",
                    collection_dir,
                    rel_path,
                    raw
                );
            }
            parsed
        }
        None => None,
    };

    Ok(ContentItem {
        kind,
        slug,
        url,
        source_path: format!("{}/{}", collection_dir.trim_matches('/'), rel_path),
        title: front.title,
        date,
        category: Category::from_value(&category),
        summary: scalar_text(&summary),
        draft: Flag::from_value(&front.draft),
        visible: Flag::from_value(&visible),
        body: body.trim_start_matches(['\r', '\n']).to_string(),
        extra: front.extra,
    })
}
