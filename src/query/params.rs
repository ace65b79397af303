//! Ordered parameter map and the rules for array-notation keys

use std::fmt;

/// Suffix marking a browser parameter that may repeat
pub const ARRAY_MARKER: &str = "[]";

/// Renaming rule applied to an array-notation key before pluralization
struct ParamRule {
    name: &'static str,
    rename: &'static str,
}

/// Browser filters whose backend name is the `_id` form
const IDENTIFIER_RULES: &[ParamRule] = &[
    ParamRule { name: "catalog", rename: "catalog_id" },
    ParamRule { name: "status", rename: "status_id" },
    ParamRule { name: "brand", rename: "brand_id" },
    ParamRule { name: "size", rename: "size_id" },
    ParamRule { name: "color", rename: "color_id" },
    ParamRule { name: "material", rename: "material_id" },
];

/// Backend key for an array-notation source key with its marker stripped.
///
/// `catalog` becomes `catalog_ids`, `size_id` becomes `size_ids`; a base that
/// is already plural (`brand_ids`) is kept as is.
pub fn array_key(base: &str) -> String {
    let base = IDENTIFIER_RULES
        .iter()
        .find(|rule| rule.name == base)
        .map(|rule| rule.rename)
        .unwrap_or(base);

    if base.ends_with("_ids") {
        base.to_string()
    } else {
        format!("{}s", base)
    }
}

/// A parameter holds either one value or the merged values of an array key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

/// Insertion-ordered parameter map.
///
/// Overwriting a key keeps its original position; new keys go to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a value, replacing any scalar or list already stored under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append to the list stored under `key`, creating it on first use.
    ///
    /// A scalar previously stored under the same key is replaced by a new list.
    pub fn push_list(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, ParamValue::List(values))) => values.push(value),
            Some((_, existing)) => *existing = ParamValue::List(vec![value]),
            None => self.entries.push((key, ParamValue::List(vec![value]))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as `key=value` pairs joined by `&`, values left as stored
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_key() {
        assert_eq!(array_key("catalog"), "catalog_ids");
        assert_eq!(array_key("status"), "status_ids");
        assert_eq!(array_key("size_id"), "size_ids");
        assert_eq!(array_key("brand_id"), "brand_ids");
        assert_eq!(array_key("brand_ids"), "brand_ids");
        assert_eq!(array_key("video_game_rating"), "video_game_ratings");
    }

    #[test]
    fn test_set_keeps_position() {
        let mut params = QueryParams::new();
        params.set("a", "1");
        params.set("b", "2");
        params.set("a", "3");

        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string(), "a=3&b=2");
    }

    #[test]
    fn test_push_list() {
        let mut params = QueryParams::new();
        params.push_list("brand_ids", "53");
        params.set("currency", "EUR");
        params.push_list("brand_ids", "34");

        assert_eq!(
            params.get("brand_ids"),
            Some(&ParamValue::List(vec!["53".to_string(), "34".to_string()]))
        );
        assert_eq!(params.to_query_string(), "brand_ids=53,34&currency=EUR");
    }

    #[test]
    fn test_push_list_replaces_scalar() {
        let mut params = QueryParams::new();
        params.set("size_ids", "1");
        params.push_list("size_ids", "207");
        assert_eq!(params.to_query_string(), "size_ids=207");
    }

    #[test]
    fn test_set_replaces_list() {
        let mut params = QueryParams::new();
        params.push_list("status_ids", "3");
        params.push_list("status_ids", "2");
        params.set("status_ids", "6");
        assert_eq!(params.get("status_ids"), Some(&ParamValue::from("6")));
    }

    #[test]
    fn test_empty() {
        let params = QueryParams::new();
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
    }
}
