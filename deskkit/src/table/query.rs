//! Query intent handed to the caller's refetch callback.
//!
//! A [`QueryIntent`] is the normalized view of what the table wants from
//! the server: which page, how many rows, the sort and every filterable
//! column's committed value. Cleared filters stay in the map as `None` so
//! the server side can drop its own filter state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("valid separator pattern"));

/// Parameter names the table itself owns. Columns with these ids cannot be
/// filterable, and a hand-built intent never emits filters under them.
pub const RESERVED_PARAMS: [&str; 4] = ["page", "per_page", "sort", "direction"];

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub column: String,
    pub direction: SortDirection,
}

impl ColumnSort {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A filter value: one string, or a set of tokens matched as alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// Normalize a raw filter input.
    ///
    /// Strings containing non-alphanumeric separators are split into
    /// distinct tokens. Arrays keep their entries, minus blanks and
    /// duplicates. Returns `None` when nothing is left, which means the
    /// filter is removed.
    pub fn normalize(self) -> Option<FilterValue> {
        match self {
            Self::Text(text) => {
                if text.is_empty() {
                    return None;
                }
                if !SEPARATOR.is_match(&text) {
                    return Some(Self::Text(text));
                }
                let tokens = dedup(SEPARATOR.split(&text).map(str::to_string));
                (!tokens.is_empty()).then_some(Self::Many(tokens))
            }
            Self::Many(values) => {
                let tokens = dedup(values);
                (!tokens.is_empty()).then_some(Self::Many(tokens))
            }
        }
    }

    /// All values as a slice-like list.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

fn dedup(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Many(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// A committed filter on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub value: FilterValue,
}

/// What the table wants the server to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
    pub sort: Option<ColumnSort>,
    /// Every filterable column, `None` when unfiltered.
    pub filters: BTreeMap<String, Option<FilterValue>>,
}

impl QueryIntent {
    /// The flat parameter map:
    /// `{ page, per_page, sort?, direction?, <column>: value | null, ... }`.
    pub fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("page".into(), Value::from(self.page));
        params.insert("per_page".into(), Value::from(self.per_page));
        if let Some(sort) = &self.sort {
            params.insert("sort".into(), Value::from(sort.column.clone()));
            params.insert("direction".into(), Value::from(sort.direction.as_str()));
        }
        for (column, value) in self.emitted_filters() {
            let value = match value {
                None => Value::Null,
                Some(FilterValue::Text(text)) => Value::from(text.clone()),
                Some(FilterValue::Many(values)) => Value::from(values.clone()),
            };
            params.insert(column.clone(), value);
        }
        params
    }

    /// The parameter map serialized as JSON.
    pub fn to_json(&self) -> String {
        Value::Object(self.to_params()).to_string()
    }

    /// The parameters encoded as a URL query string.
    ///
    /// Multi-valued filters become repeated `column[]=value` pairs and
    /// cleared filters become `column=`.
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &self.page.to_string());
        query.append_pair("per_page", &self.per_page.to_string());
        if let Some(sort) = &self.sort {
            query.append_pair("sort", &sort.column);
            query.append_pair("direction", sort.direction.as_str());
        }
        for (column, value) in self.emitted_filters() {
            match value {
                None => {
                    query.append_pair(column, "");
                }
                Some(FilterValue::Text(text)) => {
                    query.append_pair(column, text);
                }
                Some(FilterValue::Many(values)) => {
                    let key = format!("{column}[]");
                    for value in values {
                        query.append_pair(&key, value);
                    }
                }
            }
        }
        query.finish()
    }

    /// The committed value for a column, if it is filtered.
    pub fn filter(&self, column: &str) -> Option<&FilterValue> {
        self.filters.get(column).and_then(Option::as_ref)
    }

    fn emitted_filters(&self) -> impl Iterator<Item = (&String, &Option<FilterValue>)> {
        self.filters
            .iter()
            .filter(|(column, _)| !RESERVED_PARAMS.contains(&column.as_str()))
    }
}

/// Monotonic sequence number of a refetch issued by one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One invocation of the refetch callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefetchRequest {
    pub seq: RequestSeq,
    pub intent: QueryIntent,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> QueryIntent {
        let mut filters = BTreeMap::new();
        filters.insert("status".to_string(), Some(FilterValue::from(vec!["open", "late"])));
        filters.insert("name".to_string(), None);
        QueryIntent {
            page: 2,
            per_page: 25,
            sort: Some(ColumnSort::desc("created_at")),
            filters,
        }
    }

    #[test]
    fn test_plain_word_stays_text() {
        assert_eq!(
            FilterValue::from("pending").normalize(),
            Some(FilterValue::Text("pending".into()))
        );
    }

    #[test]
    fn test_separated_string_splits_into_tokens() {
        assert_eq!(
            FilterValue::from("open, late;open").normalize(),
            Some(FilterValue::from(vec!["open", "late"]))
        );
    }

    #[test]
    fn test_blank_values_remove_filter() {
        assert_eq!(FilterValue::from("").normalize(), None);
        assert_eq!(FilterValue::from(" , ").normalize(), None);
        assert_eq!(FilterValue::from(vec!["", ""]).normalize(), None);
    }

    #[test]
    fn test_accented_letters_are_not_separators() {
        assert_eq!(
            FilterValue::from("José").normalize(),
            Some(FilterValue::Text("José".into()))
        );
        assert_eq!(
            FilterValue::from("Zoë, Øst").normalize(),
            Some(FilterValue::from(vec!["Zoë", "Øst"]))
        );
        assert_eq!(
            FilterValue::from("Straße 12").normalize(),
            Some(FilterValue::from(vec!["Straße", "12"]))
        );
    }

    #[test]
    fn test_arrays_are_not_split() {
        assert_eq!(
            FilterValue::from(vec!["in transit"]).normalize(),
            Some(FilterValue::from(vec!["in transit"]))
        );
    }

    #[test]
    fn test_params_mark_cleared_filters_null() {
        let params = intent().to_params();
        assert_eq!(params["page"], Value::from(2));
        assert_eq!(params["per_page"], Value::from(25));
        assert_eq!(params["sort"], Value::from("created_at"));
        assert_eq!(params["direction"], Value::from("desc"));
        assert_eq!(params["name"], Value::Null);
        assert_eq!(params["status"], serde_json::json!(["open", "late"]));
    }

    #[test]
    fn test_query_string_encoding() {
        assert_eq!(
            intent().to_query_string(),
            "page=2&per_page=25&sort=created_at&direction=desc&name=&status%5B%5D=open&status%5B%5D=late"
        );
    }

    #[test]
    fn test_reserved_filter_names_are_skipped() {
        let mut intent = intent();
        intent
            .filters
            .insert("page".to_string(), Some(FilterValue::from("9")));
        assert_eq!(intent.to_params()["page"], Value::from(2));
    }
}
