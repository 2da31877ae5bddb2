//! Collection building and template-time predicates.
//!
//! Raw items flow through here once per build:
//!
//! ```text
//! parsed items → is_visible → group by category → stable sort by date (desc)
//! ```
//!
//! Collections borrow from the parsed items; pages receive read-only slices.
//!
//! ## Ordering
//!
//! All collections are ordered newest first. Items without a usable date sort
//! last. Sorting is stable, so items sharing a date keep their input order.
//!
//! ## Categories
//!
//! [`matches_category`] treats `category: guia` and `category: [guia, dev]`
//! the same way. [`build_categorized_collection`] places an item in the group
//! of every category it lists, so each group holds exactly the items that
//! [`filter_by_category`] would return for that name. Uncategorized items go
//! to [`UNCATEGORIZED`].

use crate::content::{Category, ContentItem};
use crate::visibility::is_visible;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Group key for items without a category.
pub const UNCATEGORIZED: &str = "outros";

/// Eligible items, in input order.
pub fn visible_only<'a, I>(items: I) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    items.into_iter().filter(|item| is_visible(item)).collect()
}

/// Stable sort, newest first, missing dates last.
fn sort_newest_first(items: &mut [&ContentItem]) {
    items.sort_by(|a, b| b.sort_date().cmp(&a.sort_date()));
}

/// Eligible items sorted newest first.
pub fn build_flat_collection(items: &[ContentItem]) -> Vec<&ContentItem> {
    let mut collection = visible_only(items);
    sort_newest_first(&mut collection);
    collection
}

/// Eligible items partitioned by category.
///
/// Groups appear in order of first occurrence in the input; each group is
/// sorted newest first on its own.
#[derive(Debug, Default)]
pub struct CategorizedCollection<'a> {
    groups: Vec<(String, Vec<&'a ContentItem>)>,
}

impl<'a> CategorizedCollection<'a> {
    pub fn get(&self, category: &str) -> Option<&[&'a ContentItem]> {
        self.groups
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a ContentItem])> {
        self.groups
            .iter()
            .map(|(key, items)| (key.as_str(), items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for CategorizedCollection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, items) in &self.groups {
            map.serialize_entry(key, items)?;
        }
        map.end()
    }
}

/// The groups an item belongs to.
///
/// Every distinct non-empty tag, in declaration order; [`UNCATEGORIZED`] when
/// there are none.
fn group_keys(category: &Category) -> Vec<&str> {
    let mut keys: Vec<&str> = Vec::new();
    for tag in category.tags() {
        if !tag.is_empty() && !keys.contains(&tag) {
            keys.push(tag);
        }
    }
    if keys.is_empty() {
        keys.push(UNCATEGORIZED);
    }
    keys
}

pub fn build_categorized_collection(items: &[ContentItem]) -> CategorizedCollection<'_> {
    let mut groups: Vec<(String, Vec<&ContentItem>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in visible_only(items) {
        for key in group_keys(&item.category) {
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((key.to_string(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(item);
        }
    }

    for (_, group) in &mut groups {
        sort_newest_first(group);
    }

    CategorizedCollection { groups }
}

/// Whether an item is tagged with `category` (exact, case-sensitive).
pub fn matches_category(item: &ContentItem, category: &str) -> bool {
    item.category.contains(category)
}

/// Eligible items tagged with `category`, in input order.
pub fn filter_by_category<'a, I>(items: I, category: &str) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    items
        .into_iter()
        .filter(|item| is_visible(item) && matches_category(item, category))
        .collect()
}

/// Eligible items whose title or summary contains `term`, case-insensitively.
///
/// A blank term returns every eligible item.
pub fn search_by_title<'a, I>(items: I, term: &str) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let eligible = visible_only(items);
    if term.trim().is_empty() {
        return eligible;
    }

    let needle = term.to_lowercase();
    eligible
        .into_iter()
        .filter(|item| {
            item.title.to_lowercase().contains(&needle)
                || item
                    .summary
                    .as_ref()
                    .is_some_and(|summary| summary.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The first `n` elements, in their existing order.
pub fn limit<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// Filters for the case-study listing.
///
/// Empty criteria match everything. `modalidade` must match exactly;
/// `formato` and `objetivo` match as substrings, since a case can list
/// several formats or goals in one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    pub modalidade: String,
    pub formato: String,
    pub objetivo: String,
}

impl CaseFilter {
    pub fn is_empty(&self) -> bool {
        self.modalidade.is_empty() && self.formato.is_empty() && self.objetivo.is_empty()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        let field = |key: &str| item.extra_text(key).unwrap_or_default();

        (self.modalidade.is_empty() || field("modalidade") == self.modalidade)
            && (self.formato.is_empty() || field("formato").contains(&self.formato))
            && (self.objetivo.is_empty() || field("objetivo").contains(&self.objetivo))
    }
}

/// Read a list of items out of an arbitrary JSON value.
///
/// Anything that is not an array becomes an empty collection; array elements
/// that are not items are skipped. A bad collection costs one page its items,
/// never the whole build.
pub fn items_from_value(value: Value) -> Vec<ContentItem> {
    match value {
        Value::Array(elements) => elements
            .into_iter()
            .enumerate()
            .filter_map(|(i, element)| match serde_json::from_value(element) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("skipping malformed content item #{}: {}", i, e);
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(
                "expected a list of content items, found {}; using an empty collection",
                json_type_name(&other)
            );
            Vec::new()
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `deserialize_with` adapter around [`items_from_value`].
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Vec<ContentItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(items_from_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Flag;
    use crate::test_helpers::*;
    use serde_json::json;

    // =========================================================================
    // build_flat_collection
    // =========================================================================

    #[test]
    fn flat_collection_drops_hidden_and_sorts() {
        let mut a = dated("A", "2024-01-01");
        a.draft = Flag::True;
        let b = dated("B", "2024-06-01");
        let mut c = dated("C", "2023-01-01");
        c.visible = Flag::from_text("no");

        let items = vec![a, b, c];
        assert_eq!(titles(&build_flat_collection(&items)), vec!["B"]);
    }

    #[test]
    fn flat_collection_is_newest_first() {
        let items = vec![
            dated("old", "2020-01-01"),
            dated("new", "2024-01-01"),
            dated("mid", "2022-01-01"),
        ];
        assert_eq!(
            titles(&build_flat_collection(&items)),
            vec!["new", "mid", "old"]
        );
    }

    #[test]
    fn flat_collection_ties_keep_input_order() {
        let items = vec![
            dated("first", "2024-01-01"),
            dated("newer", "2024-02-01"),
            dated("second", "2024-01-01"),
            dated("third", "2024-01-01"),
        ];
        assert_eq!(
            titles(&build_flat_collection(&items)),
            vec!["newer", "first", "second", "third"]
        );
    }

    #[test]
    fn flat_collection_undated_items_sort_last_in_input_order() {
        let items = vec![
            item("undated-1"),
            dated("dated", "2001-01-01"),
            item("undated-2"),
        ];
        assert_eq!(
            titles(&build_flat_collection(&items)),
            vec!["dated", "undated-1", "undated-2"]
        );
    }

    #[test]
    fn flat_collection_output_is_non_increasing() {
        let items = vec![
            dated("a", "2021-03-01"),
            item("b"),
            dated("c", "2023-03-01"),
            dated("d", "2021-03-01"),
            dated("e", "2022-12-31"),
        ];
        let flat = build_flat_collection(&items);
        for pair in flat.windows(2) {
            assert!(pair[0].sort_date() >= pair[1].sort_date());
        }
    }

    #[test]
    fn flat_collection_of_nothing_is_empty() {
        assert!(build_flat_collection(&[]).is_empty());
    }

    // =========================================================================
    // build_categorized_collection
    // =========================================================================

    #[test]
    fn categorized_groups_by_category() {
        let items = vec![
            categorized("X", "guia", "2024-02-01"),
            categorized("Y", "tutorial", "2024-03-01"),
            dated("Z", "2024-01-01"),
        ];
        let groups = build_categorized_collection(&items);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["guia", "tutorial", "outros"]);
        assert_eq!(titles(groups.get("guia").unwrap()), vec!["X"]);
        assert_eq!(titles(groups.get("tutorial").unwrap()), vec!["Y"]);
        assert_eq!(titles(groups.get("outros").unwrap()), vec!["Z"]);
    }

    #[test]
    fn categorized_groups_sort_internally_and_keep_first_seen_order() {
        let items = vec![
            categorized("b-old", "b", "2020-01-01"),
            categorized("a-old", "a", "2020-01-01"),
            categorized("b-new", "b", "2024-01-01"),
            categorized("a-new", "a", "2024-01-01"),
        ];
        let groups = build_categorized_collection(&items);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(titles(groups.get("b").unwrap()), vec!["b-new", "b-old"]);
        assert_eq!(titles(groups.get("a").unwrap()), vec!["a-new", "a-old"]);
    }

    #[test]
    fn categorized_excludes_hidden_items() {
        let mut hidden = categorized("hidden", "guia", "2024-01-01");
        hidden.visible = Flag::False;
        let mut draft = categorized("draft", "solo", "2024-01-01");
        draft.draft = Flag::True;
        let items = vec![hidden, draft, categorized("shown", "guia", "2023-01-01")];

        let groups = build_categorized_collection(&items);
        assert_eq!(groups.len(), 1);
        assert!(groups.get("solo").is_none());
        assert_eq!(titles(groups.get("guia").unwrap()), vec!["shown"]);
    }

    #[test]
    fn categorized_places_list_items_in_every_group() {
        let mut both = dated("both", "2024-01-01");
        both.category = Category::Multiple(vec!["a".into(), "b".into(), "a".into()]);
        let items = vec![both, categorized("only-b", "b", "2024-05-01")];

        let groups = build_categorized_collection(&items);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(titles(groups.get("a").unwrap()), vec!["both"]);
        assert_eq!(titles(groups.get("b").unwrap()), vec!["only-b", "both"]);
    }

    #[test]
    fn categorized_empty_category_is_uncategorized() {
        let mut empty_list = dated("empty-list", "2024-01-01");
        empty_list.category = Category::Multiple(vec![]);
        let empty_text = categorized("empty-text", "", "2023-01-01");

        let items = vec![empty_list, empty_text];
        let groups = build_categorized_collection(&items);
        assert_eq!(
            titles(groups.get(UNCATEGORIZED).unwrap()),
            vec!["empty-list", "empty-text"]
        );
    }

    #[test]
    fn categorized_serializes_as_ordered_map() {
        let items = vec![
            categorized("Y", "z-last-alphabetically", "2024-01-01"),
            categorized("X", "a-first", "2024-01-01"),
        ];
        let groups = build_categorized_collection(&items);
        let json = serde_json::to_string(&groups).unwrap();
        let z = json.find("z-last-alphabetically").unwrap();
        let a = json.find("a-first").unwrap();
        assert!(z < a);
    }

    // =========================================================================
    // Predicates
    // =========================================================================

    #[test]
    fn matches_category_single_and_list_are_equivalent() {
        let mut listed = item("listed");
        listed.category = Category::Multiple(vec!["a".into(), "b".into()]);
        assert!(matches_category(&listed, "a"));
        assert!(matches_category(&listed, "b"));
        assert!(!matches_category(&listed, "c"));

        let single = categorized("single", "a", "2024-01-01");
        assert!(matches_category(&single, "a"));
        assert!(!matches_category(&single, "A"));
    }

    #[test]
    fn absent_category_never_matches() {
        assert!(!matches_category(&item("none"), "outros"));
        assert!(!matches_category(&item("none"), "guia"));
    }

    #[test]
    fn filter_by_category_skips_hidden() {
        let mut hidden = categorized("hidden", "guia", "2024-01-01");
        hidden.draft = Flag::True;
        let items = vec![
            categorized("one", "guia", "2020-01-01"),
            hidden,
            categorized("other", "dev", "2024-01-01"),
            categorized("two", "guia", "2024-01-01"),
        ];
        assert_eq!(titles(&filter_by_category(&items, "guia")), vec!["one", "two"]);
    }

    #[test]
    fn filter_by_category_over_flat_collection_keeps_its_order() {
        let items = vec![
            categorized("old", "guia", "2020-01-01"),
            categorized("new", "guia", "2024-01-01"),
        ];
        let flat = build_flat_collection(&items);
        let view = filter_by_category(flat.iter().copied(), "guia");
        assert_eq!(titles(&view), vec!["new", "old"]);
    }

    #[test]
    fn search_blank_term_returns_eligible_in_input_order() {
        let mut hidden = item("hidden");
        hidden.visible = Flag::False;
        let items = vec![item("b"), hidden, item("a")];

        assert_eq!(titles(&search_by_title(&items, "")), vec!["b", "a"]);
        assert_eq!(titles(&search_by_title(&items, "   ")), vec!["b", "a"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let items = vec![item("Guia completo"), item("Outro texto")];
        assert_eq!(titles(&search_by_title(&items, "GUIA")), vec!["Guia completo"]);
        assert_eq!(titles(&search_by_title(&items, "complet")), vec!["Guia completo"]);
    }

    #[test]
    fn search_matches_summary() {
        let mut with_summary = item("Sem relação");
        with_summary.summary = Some("Um GUIA escondido".into());
        let items = vec![with_summary, item("Nada")];
        assert_eq!(titles(&search_by_title(&items, "guia")), vec!["Sem relação"]);
    }

    #[test]
    fn search_never_returns_hidden_items() {
        let mut hidden = item("Guia secreto");
        hidden.draft = Flag::True;
        let items = vec![hidden];
        assert!(search_by_title(&items, "guia").is_empty());
    }

    #[test]
    fn limit_truncates_without_reordering() {
        let seq = [3, 1, 2];
        assert_eq!(limit(&seq, 0), &[] as &[i32]);
        assert_eq!(limit(&seq, 2), &[3, 1]);
        assert_eq!(limit(&seq, 1000), &[3, 1, 2]);
    }

    #[test]
    fn case_filter_rules() {
        let mut case = item("Caso");
        case.extra.insert("modalidade".into(), json!("consultoria"));
        case.extra.insert("formato".into(), json!(["online", "presencial"]));
        case.extra.insert("objetivo".into(), json!("vendas e marketing"));

        assert!(CaseFilter::default().matches(&case));

        let exact = CaseFilter {
            modalidade: "consultoria".into(),
            ..Default::default()
        };
        assert!(exact.matches(&case));

        let partial_modalidade = CaseFilter {
            modalidade: "consult".into(),
            ..Default::default()
        };
        assert!(!partial_modalidade.matches(&case));

        let substrings = CaseFilter {
            formato: "presencial".into(),
            objetivo: "vendas".into(),
            ..Default::default()
        };
        assert!(substrings.matches(&case));

        let missing = CaseFilter {
            objetivo: "branding".into(),
            ..Default::default()
        };
        assert!(!missing.matches(&case));
        assert!(!missing.matches(&item("sem metadados")));
    }

    // =========================================================================
    // Lenient deserialization
    // =========================================================================

    #[test]
    fn non_array_collection_is_empty() {
        assert!(items_from_value(json!({"title": "oops"})).is_empty());
        assert!(items_from_value(json!("artigos")).is_empty());
        assert!(items_from_value(Value::Null).is_empty());
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let good = serde_json::to_value(item("ok")).unwrap();
        let value = json!([good, 42, null, {"title": "missing fields"}]);
        let items = items_from_value(value);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "ok");
    }
}
