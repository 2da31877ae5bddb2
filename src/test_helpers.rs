//! Shared test utilities for the folio test suite.
//!
//! Item builders for collection tests, plus content-tree fixtures and lookup
//! helpers for scan/generate tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let items = vec![dated("B", "2024-06-01"), categorized("X", "guia", "2024-02-01")];
//! assert_eq!(titles(&build_flat_collection(&items)), vec!["B", "X"]);
//!
//! let tmp = setup_content();
//! let manifest = scan(tmp.path()).unwrap();
//! let guia = find_item(&manifest.articles, "Guia completo");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{Category, ContentItem, ContentKind, Flag, parse_date, slugify};
use crate::generate::{GenerateReport, GeneratedPage};

// =========================================================================
// Item builders
// =========================================================================

/// An undated, uncategorized, visible article.
pub fn item(title: &str) -> ContentItem {
    let slug = slugify(title);
    ContentItem {
        kind: ContentKind::Articles,
        url: format!("/artigos/{slug}/"),
        source_path: format!("artigos/{slug}.md"),
        slug,
        title: title.to_string(),
        date: None,
        category: Category::Absent,
        summary: None,
        draft: Flag::Unset,
        visible: Flag::Unset,
        body: String::new(),
        extra: Default::default(),
    }
}

/// A visible article with a date. Panics on an unparseable date.
pub fn dated(title: &str, date: &str) -> ContentItem {
    let mut item = item(title);
    item.date = Some(parse_date(date).unwrap_or_else(|| panic!("bad test date {date:?}")));
    item
}

/// A dated article with a single category.
pub fn categorized(title: &str, category: &str, date: &str) -> ContentItem {
    let mut item = dated(title, date);
    item.category = Category::Single(category.to_string());
    item
}

/// Titles in collection order.
pub fn titles<'a>(items: &[&'a ContentItem]) -> Vec<&'a str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

// =========================================================================
// Content fixtures
// =========================================================================

/// Write a markdown file with the given front-matter lines under `root`.
pub fn write_item(root: &Path, rel_path: &str, front_matter: &str, body: &str) {
    let path = root.join(rel_path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, format!("---\n{front_matter}\n---\n{body}")).unwrap();
}

/// A small content tree covering every collection and visibility rule.
///
/// ```text
/// artigos/guia.md          Guia completo   guia       2024-02-01
/// artigos/tutorial.md      Tutorial        tutorial   2024-03-01
/// artigos/solto.md         Solto           -          2024-01-01
/// artigos/rascunho.md      Rascunho        guia       draft
/// artigos/2023/antigo.md   Antigo          [guia, dev] 2023-01-01
/// projetos/site.md         Site            -          2024-05-01
/// projetos/oculto.md       Oculto          -          visible: hidden
/// casos/loja.md            Loja            -          modalidade/formato/objetivo
/// ```
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write_item(
        root,
        "artigos/guia.md",
        "title: Guia completo\ndate: 2024-02-01\ncategory: guia\nsummary: Tudo sobre o tema",
        "# Guia\n\nTexto com nota[^1].\n\n[^1]: A nota.\n",
    );
    write_item(
        root,
        "artigos/tutorial.md",
        "title: Tutorial\ndate: 2024-03-01\ncategory: tutorial",
        "Passo a passo.\n",
    );
    write_item(root, "artigos/solto.md", "title: Solto\ndate: 2024-01-01", "");
    write_item(
        root,
        "artigos/rascunho.md",
        "title: Rascunho\ndate: 2024-04-01\ncategory: guia\ndraft: true",
        "",
    );
    write_item(
        root,
        "artigos/2023/antigo.md",
        "title: Antigo\ndata: 2023-01-01\ncategoria: [guia, dev]",
        "",
    );
    write_item(root, "projetos/site.md", "title: Site\ndate: 2024-05-01", "");
    write_item(
        root,
        "projetos/oculto.md",
        "title: Oculto\ndate: 2024-06-01\nvisible: hidden",
        "",
    );
    write_item(
        root,
        "casos/loja.md",
        "title: Loja\ndate: 2022-01-01\nmodalidade: consultoria\nformato: online\nobjetivo: vendas",
        "",
    );
    tmp
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an item by title. Panics if not found.
pub fn find_item<'a>(items: &'a [ContentItem], title: &str) -> &'a ContentItem {
    items.iter().find(|i| i.title == title).unwrap_or_else(|| {
        let available: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        panic!("item '{title}' not found. Available: {available:?}")
    })
}

/// Find a generated page by output path. Panics if not found.
pub fn find_page<'a>(report: &'a GenerateReport, path: &str) -> &'a GeneratedPage {
    report
        .pages
        .iter()
        .find(|p| p.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = report.pages.iter().map(|p| p.path.as_str()).collect();
            panic!("page '{path}' not generated. Available: {paths:?}")
        })
}
