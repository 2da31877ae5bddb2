//! HTML site generation.
//!
//! Stage 2 of the build pipeline. Takes the scan manifest, builds the public
//! collections once, and renders the static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): enabled sections only; case studies, projects
//!   and articles show the newest few items, articles grouped in category tabs
//! - **Listings** (`/{dir}/index.html`): every visible item of a collection
//! - **Categories** (`/{articles}/categoria/{slug}/index.html`): one page per
//!   article category
//! - **Items** (`/{dir}/{slug}/index.html`): markdown body rendered to HTML
//!
//! Hidden items (drafts, `visible: false`) never get a page and never appear
//! in a listing.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── artigos/
//! │   ├── index.html
//! │   ├── guia/index.html
//! │   └── categoria/
//! │       └── guia/index.html
//! ├── projetos/
//! │   ├── index.html
//! │   └── site/index.html
//! └── casos/
//!     ├── index.html
//!     └── loja/index.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped; only rendered markdown goes through
//! `PreEscaped`.

use crate::collections::{
    CategorizedCollection, build_categorized_collection, build_flat_collection, limit,
};
use crate::config::{SectionConfig, SiteConfig};
use crate::content::{ContentItem, ContentKind, slugify};
use crate::format::{format_date_br, format_date_iso};
use crate::scan::Manifest;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path} would be written twice: by \"{first}\" and by \"{second}\"")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },
}

/// What a written page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    Listing(ContentKind),
    Category,
    Item(ContentKind),
}

/// One written HTML file.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPage {
    pub title: String,
    /// Path relative to the output directory
    pub path: String,
    pub kind: PageKind,
}

#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
}

impl GenerateReport {
    pub fn item_pages(&self, kind: ContentKind) -> usize {
        self.pages
            .iter()
            .filter(|p| p.kind == PageKind::Item(kind))
            .count()
    }
}

const CSS: &str = include_str!("../static/style.css");

/// The public collections of one build, borrowed from the manifest.
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub sections: SectionConfig,
    pub partials: &'a BTreeMap<String, String>,
    pub articles: Vec<&'a ContentItem>,
    pub projects: Vec<&'a ContentItem>,
    pub case_studies: Vec<&'a ContentItem>,
    pub articles_by_category: CategorizedCollection<'a>,
}

impl<'a> Site<'a> {
    pub fn build(manifest: &'a Manifest) -> Self {
        Self {
            config: &manifest.config,
            sections: manifest.sections,
            partials: &manifest.partials,
            articles: build_flat_collection(&manifest.articles),
            projects: build_flat_collection(&manifest.projects),
            case_studies: build_flat_collection(&manifest.case_studies),
            articles_by_category: build_categorized_collection(&manifest.articles),
        }
    }

    pub fn collection(&self, kind: ContentKind) -> &[&'a ContentItem] {
        match kind {
            ContentKind::Articles => &self.articles,
            ContentKind::Projects => &self.projects,
            ContentKind::CaseStudies => &self.case_studies,
        }
    }

    fn listing_url(&self, kind: ContentKind) -> String {
        format!("/{}/", self.config.collections.dir(kind).trim_matches('/'))
    }

    fn category_url(&self, category: &str) -> String {
        format!(
            "/{}/categoria/{}/",
            self.config.collections.articles.trim_matches('/'),
            slugify(category)
        )
    }
}

/// Read the scan manifest and write the site to `output_dir`.
pub fn generate(manifest_path: &Path, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;
    render_site(&manifest, output_dir)
}

/// Render every page of the site into `output_dir`.
///
/// Fails if two pages map to the same output path, before the second one
/// is written.
pub fn render_site(manifest: &Manifest, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    let site = Site::build(manifest);
    let mut writer = PageWriter::new(output_dir);
    fs::create_dir_all(output_dir)?;

    writer.write(
        &site.config.title,
        "index.html".to_string(),
        PageKind::Home,
        render_home(&site),
    )?;

    for kind in ContentKind::ALL {
        let listing_path = format!("{}index.html", site.listing_url(kind).trim_start_matches('/'));
        writer.write(
            kind.label(),
            listing_path,
            PageKind::Listing(kind),
            render_listing(&site, kind),
        )?;

        for item in site.collection(kind) {
            let path = format!("{}/index.html", item.url.trim_matches('/'));
            writer.write(
                &item.title,
                path,
                PageKind::Item(kind),
                render_item_page(&site, item),
            )?;
        }
    }

    for (category, items) in site.articles_by_category.iter() {
        let path = format!("{}index.html", site.category_url(category).trim_start_matches('/'));
        writer.write(
            category,
            path,
            PageKind::Category,
            render_category_page(&site, category, items),
        )?;
    }

    tracing::debug!("wrote {} pages to {}", writer.report.pages.len(), output_dir.display());
    Ok(writer.report)
}

/// Writes pages and refuses to write two to the same path.
struct PageWriter<'a> {
    output_dir: &'a Path,
    report: GenerateReport,
    /// Output path → title of the page written there
    written: HashMap<String, String>,
}

impl<'a> PageWriter<'a> {
    fn new(output_dir: &'a Path) -> Self {
        Self {
            output_dir,
            report: GenerateReport::default(),
            written: HashMap::new(),
        }
    }

    fn write(
        &mut self,
        title: &str,
        path: String,
        kind: PageKind,
        page: Markup,
    ) -> Result<(), GenerateError> {
        if let Some(first) = self.written.get(&path) {
            return Err(GenerateError::PathCollision {
                path,
                first: first.clone(),
                second: title.to_string(),
            });
        }
        write_page(self.output_dir, &path, page)?;
        self.written.insert(path.clone(), title.to_string());
        self.report.pages.push(GeneratedPage {
            title: title.to_string(),
            path,
            kind,
        });
        Ok(())
    }
}

fn write_page(output_dir: &Path, rel_path: &str, page: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, page.into_string())
}

/// Markdown to HTML with the extensions content authors rely on.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(site: &Site, title: &str, content: Markup) -> Markup {
    let full_title = if title == site.config.title {
        title.to_string()
    } else {
        format!("{} | {}", title, site.config.title)
    };
    html! {
        (DOCTYPE)
        html lang=(site.config.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !site.config.description.is_empty() {
                    meta name="description" content=(site.config.description);
                }
                title { (full_title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(site))
                (content)
                (site_footer(site))
            }
        }
    }
}

/// Renders the site header with links to the enabled collections
fn site_header(site: &Site) -> Markup {
    let links = [
        (site.sections.casos, ContentKind::CaseStudies),
        (site.sections.projetos, ContentKind::Projects),
        (site.sections.artigos, ContentKind::Articles),
    ];
    html! {
        header.site-header {
            a.site-header__brand href="/" { (site.config.title) }
            nav.site-header__nav {
                ul {
                    @for (enabled, kind) in links {
                        @if enabled {
                            li { a href=(site.listing_url(kind)) { (kind.label()) } }
                        }
                    }
                    @if site.sections.contato {
                        li { a href="/#contato" { "Contato" } }
                    }
                }
            }
        }
    }
}

fn site_footer(site: &Site) -> Markup {
    html! {
        footer.site-footer {
            @if !site.config.author.name.is_empty() {
                p { "© " (site.config.author.name) }
            }
        }
    }
}

/// Renders a card for an article or project
fn item_card(site: &Site, item: &ContentItem) -> Markup {
    let categories = item.category.tags().join(" ");
    html! {
        article.card data-category=(categories) {
            a.card__link href=(item.url) {
                h3.card__title { (item.title) }
            }
            @if item.date.is_some() {
                time.card__date datetime=(format_date_iso(item.date)) { (format_date_br(item.date)) }
            }
            @if let Some(summary) = &item.summary {
                p.card__summary { (summary) }
            }
            @if item.kind == ContentKind::Articles {
                (category_tags(site, item))
            }
        }
    }
}

/// Renders a case-study card; the data attributes feed the client-side filters
fn case_card(item: &ContentItem) -> Markup {
    let field = |key: &str| item.extra_text(key).unwrap_or_default();
    html! {
        article.case-card
            data-modalidade=(field("modalidade"))
            data-formato=(field("formato"))
            data-objetivo=(field("objetivo")) {
            a.card__link href=(item.url) {
                h3.card__title { (item.title) }
            }
            @if let Some(summary) = &item.summary {
                p.card__summary { (summary) }
            }
        }
    }
}

fn card(site: &Site, item: &ContentItem) -> Markup {
    match item.kind {
        ContentKind::CaseStudies => case_card(item),
        _ => item_card(site, item),
    }
}

fn card_grid(site: &Site, items: &[&ContentItem], category: Option<&str>) -> Markup {
    html! {
        div.grid data-category=[category] {
            @for item in items {
                (card(site, item))
            }
        }
    }
}

fn category_tags(site: &Site, item: &ContentItem) -> Markup {
    html! {
        @let tags = item.category.tags();
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    @if !tag.is_empty() {
                        li { a href=(site.category_url(tag)) { (tag) } }
                    }
                }
            }
        }
    }
}

fn partial(site: &Site, name: &str) -> Option<Markup> {
    site.partials
        .get(name)
        .map(|md| PreEscaped(markdown_to_html(md)))
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page, section by section
pub fn render_home(site: &Site) -> Markup {
    let content = html! {
        main.home {
            @for name in SectionConfig::NAMES {
                @if site.sections.is_enabled(name) {
                    (render_home_section(site, name))
                }
            }
        }
    };
    base_document(site, &site.config.title, content)
}

fn render_home_section(site: &Site, name: &str) -> Markup {
    match name {
        "hero" => html! {
            section.hero id="hero" {
                h1 { (site.config.title) }
                @if !site.config.description.is_empty() {
                    p.hero__description { (site.config.description) }
                }
                @if let Some(body) = partial(site, name) { (body) }
            }
        },
        "casos" => home_collection(site, name, ContentKind::CaseStudies),
        "projetos" => home_collection(site, name, ContentKind::Projects),
        "artigos" => home_articles(site),
        "contato" => html! {
            section.contact id="contato" {
                h2 { "Contato" }
                @if let Some(body) = partial(site, name) {
                    (body)
                } @else {
                    @if !site.config.author.email.is_empty() {
                        p { a href={ "mailto:" (site.config.author.email) } { (site.config.author.email) } }
                    }
                }
                @if !site.config.social.is_empty() {
                    ul.social {
                        @for (label, url) in &site.config.social {
                            li { a href=(url) rel="noopener" target="_blank" { (label) } }
                        }
                    }
                }
            }
        },
        // sobre, modalidades, videos: authored entirely in markdown
        _ => match partial(site, name) {
            Some(body) => html! { section id=(name) { (body) } },
            None => html! {},
        },
    }
}

fn home_collection(site: &Site, id: &str, kind: ContentKind) -> Markup {
    let items = site.collection(kind);
    if items.is_empty() {
        return html! {};
    }
    let shown = limit(items, site.config.home.limit(kind));
    html! {
        section id=(id) {
            h2 { (kind.label()) }
            (card_grid(site, shown, None))
            @if shown.len() < items.len() {
                p.more { a href=(site.listing_url(kind)) { "Ver todos" } }
            }
        }
    }
}

/// Articles as tabs: one panel per category, newest first
fn home_articles(site: &Site) -> Markup {
    if site.articles.is_empty() {
        return html! {};
    }
    let per_tab = site.config.home.articles;
    html! {
        section.articles id="artigos" {
            h2 { (ContentKind::Articles.label()) }
            div.articles-tabs role="tablist" {
                @for (i, category) in site.articles_by_category.keys().enumerate() {
                    button.articles-tabs__tab
                        role="tab"
                        aria-controls={ "panel-" (slugify(category)) }
                        aria-selected=(if i == 0 { "true" } else { "false" }) {
                        (category)
                    }
                }
            }
            @for (i, (category, items)) in site.articles_by_category.iter().enumerate() {
                div.articles__panel id={ "panel-" (slugify(category)) } role="tabpanel" hidden[i > 0] {
                    (card_grid(site, limit(items, per_tab), Some(category)))
                    @if items.len() > per_tab {
                        p.more { a href=(site.category_url(category)) { "Ver todos" } }
                    }
                }
            }
        }
    }
}

/// Renders the listing page of one collection
pub fn render_listing(site: &Site, kind: ContentKind) -> Markup {
    let items = site.collection(kind);
    let content = html! {
        main.listing {
            h1 { (kind.label()) }
            @if items.is_empty() {
                p.empty { "Nada publicado ainda." }
            } @else {
                (card_grid(site, items, None))
            }
        }
    };
    base_document(site, kind.label(), content)
}

/// Renders the page of one article category
pub fn render_category_page(site: &Site, category: &str, items: &[&ContentItem]) -> Markup {
    let content = html! {
        main.listing {
            p.breadcrumb {
                a href=(site.listing_url(ContentKind::Articles)) { (ContentKind::Articles.label()) }
                " › "
                (category)
            }
            h1 { (category) }
            (card_grid(site, items, Some(category)))
        }
    };
    base_document(site, category, content)
}

/// Renders a single item with its markdown body
pub fn render_item_page(site: &Site, item: &ContentItem) -> Markup {
    let body = markdown_to_html(&item.body);
    let content = html! {
        main.item {
            article {
                p.breadcrumb {
                    a href=(site.listing_url(item.kind)) { (item.kind.label()) }
                }
                h1 { (item.title) }
                @if item.date.is_some() {
                    time datetime=(format_date_iso(item.date)) { (format_date_br(item.date)) }
                }
                @if item.kind == ContentKind::Articles {
                    (category_tags(site, item))
                }
                div.item__body {
                    (PreEscaped(body))
                }
            }
        }
    };
    base_document(site, &item.title, content)
}

// ============================================================================
// Tests
// ============================================================================
