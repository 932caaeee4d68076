//! Query-string normalization for the article listing.
//!
//! Incoming query parameters may be missing, single-valued or repeated. They
//! are flattened into a [`QueryParams`] map where every value is a string.

use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

/// A query parameter before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawParam {
    /// Present as a key with no value (`null`/`undefined` upstream).
    Absent,
    One(String),
    Many(Vec<String>),
}

impl From<&str> for RawParam {
    fn from(value: &str) -> Self {
        RawParam::One(value.to_string())
    }
}

impl From<Vec<String>> for RawParam {
    fn from(values: Vec<String>) -> Self {
        RawParam::Many(values)
    }
}

/// Flattens one raw value: absent becomes `""`, lists are joined with `,`.
pub fn normalize_param(raw: &RawParam) -> String {
    match raw {
        RawParam::Absent => String::new(),
        RawParam::One(value) => value.clone(),
        RawParam::Many(values) => values.join(","),
    }
}

/// Normalizes every entry. Never fails.
pub fn normalize_params<I, K>(raw: I) -> QueryParams
where
    I: IntoIterator<Item = (K, RawParam)>,
    K: Into<String>,
{
    QueryParams(
        raw.into_iter()
            .map(|(key, value)| (key.into(), normalize_param(&value)))
            .collect(),
    )
}

/// Flat string-to-string query parameters for `/articles`.
///
/// Recognized keys are `q`, `category` and `page`; other keys are carried
/// through untouched so derived links keep them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (with or without a leading `?`). Repeated keys
    /// are joined with `,` in the order they appear.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value.into_owned()),
                None => grouped.push((key.into_owned(), vec![value.into_owned()])),
            }
        }
        normalize_params(grouped.into_iter().map(|(key, mut values)| {
            let raw = if values.len() == 1 {
                RawParam::One(values.remove(0))
            } else {
                RawParam::Many(values)
            };
            (key, raw)
        }))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.0.remove(key);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Search text (`q`), empty when unset.
    pub fn search(&self) -> &str {
        self.get("q").unwrap_or("")
    }

    /// Category slug, empty when unset.
    pub fn category(&self) -> &str {
        self.get("category").unwrap_or("")
    }

    /// Requested page. Missing, non-numeric and non-positive values read as 1.
    pub fn page(&self) -> i64 {
        self.get("page")
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    /// Same filters on another category, back on page 1.
    pub fn with_category(&self, slug: &str) -> Self {
        let mut next = self.clone();
        next.set("category", slug);
        next.set("page", "1");
        next
    }

    /// The "All" chip: current filters minus the category, back on page 1.
    pub fn without_category(&self) -> Self {
        let mut next = self.clone();
        next.remove("category");
        next.set("page", "1");
        next
    }

    /// Same filters with new search text and no explicit page (so page 1).
    /// Blank text clears the search.
    pub fn with_search(&self, search: &str) -> Self {
        let mut next = self.clone();
        match search.trim() {
            "" => next.remove("q"),
            trimmed => next.set("q", trimmed),
        }
        next.remove("page");
        next
    }

    pub fn with_page(&self, page: i64) -> Self {
        let mut next = self.clone();
        next.set("page", &page.max(1).to_string());
        next
    }

    /// Form-urlencoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// `path?query`, or just `path` when there are no parameters.
    pub fn href(&self, path: &str) -> String {
        if self.0.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, self.to_query_string())
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        QueryParams(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_becomes_empty_string() {
        let params = normalize_params([("q", RawParam::Absent)]);
        assert_eq!(params.get("q"), Some(""));
    }

    #[test]
    fn lists_join_with_n_minus_one_commas() {
        for n in 1..6 {
            let values: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();
            let params = normalize_params([("category", RawParam::Many(values))]);
            let joined = params.get("category").unwrap();
            assert_eq!(joined.matches(',').count(), n - 1);
        }
    }

    #[test]
    fn lists_keep_order_and_duplicates() {
        let raw = RawParam::Many(vec!["b".into(), "a".into(), "b".into()]);
        assert_eq!(normalize_param(&raw), "b,a,b");
    }

    #[test]
    fn empty_list_is_empty_string() {
        assert_eq!(normalize_param(&RawParam::Many(Vec::new())), "");
    }

    #[test]
    fn parse_joins_repeated_keys() {
        let params = QueryParams::parse("?category=alaska&category=texas&q=sr22");
        assert_eq!(params.category(), "alaska,texas");
        assert_eq!(params.search(), "sr22");
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(QueryParams::parse("").page(), 1);
        assert_eq!(QueryParams::parse("page=abc").page(), 1);
        assert_eq!(QueryParams::parse("page=0").page(), 1);
        assert_eq!(QueryParams::parse("page=-4").page(), 1);
        assert_eq!(QueryParams::parse("page=7").page(), 7);
    }

    #[test]
    fn round_trip_preserves_filters() {
        let original: QueryParams = [
            ("q", "full coverage & more"),
            ("category", "new-york,ohio"),
            ("page", "3"),
        ]
        .into_iter()
        .collect();
        let reparsed = QueryParams::parse(&original.to_query_string());
        assert_eq!(reparsed, original);
    }

    #[test]
    fn changing_category_resets_page() {
        let params = QueryParams::parse("q=teen&category=alaska&page=5");
        let next = params.with_category("texas");
        assert_eq!(next.page(), 1);
        assert_eq!(next.get("page"), Some("1"));
        assert_eq!(next.search(), "teen");
        assert!(next.href("/articles").contains("page=1"));
    }

    #[test]
    fn all_chip_drops_category_and_resets_page() {
        let params = QueryParams::parse("q=teen&category=alaska&page=5");
        let all = params.without_category();
        assert_eq!(all.get("category"), None);
        assert_eq!(all.get("page"), Some("1"));
        assert_eq!(all.search(), "teen");
    }

    #[test]
    fn changing_search_resets_page() {
        let params = QueryParams::parse("q=teen&page=4");
        let next = params.with_search("  sr22 ");
        assert_eq!(next.search(), "sr22");
        assert_eq!(next.page(), 1);
        assert_eq!(next.get("page"), None);
        assert_eq!(next.href("/articles"), "/articles?q=sr22");
        assert_eq!(params.with_search("   ").href("/articles"), "/articles");
    }

    #[test]
    fn href_without_params_is_bare_path() {
        assert_eq!(QueryParams::new().href("/articles"), "/articles");
        assert_eq!(
            QueryParams::parse("page=2").href("/articles"),
            "/articles?page=2"
        );
    }
}
