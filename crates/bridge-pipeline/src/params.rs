//! Ordered, multi-valued query parameters.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Query-string parameters in arrival order. Repeated keys are kept, which
/// matters for `fq`, `facet.field` and `facet.query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decode an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Solr-style boolean: `true`, `on` or `yes`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "on" | "yes")
        )
    }

    /// Per-field override (`f.<field>.<key>`) falling back to the global key.
    pub fn field_param(&self, field: &str, key: &str) -> Option<&str> {
        self.get(&format!("f.{field}.{key}")).or_else(|| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Echo form used in legacy response headers: single values as strings,
    /// repeated keys as arrays.
    pub fn to_echo_json(&self) -> Value {
        let mut echoed = Map::new();
        for (key, value) in self.iter() {
            match echoed.get_mut(key) {
                Some(Value::Array(values)) => values.push(Value::String(value.to_string())),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value.to_string())]);
                }
                None => {
                    echoed.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }
        Value::Object(echoed)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// `+` is a space; percent escapes are decoded. Bad escapes keep the raw text.
fn decode_component(raw: &str) -> String {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let params = QueryParams::parse("q=*:*&fq=a:1&rows=5&fq=b:2");
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("fq"), Some("a:1"));
        assert_eq!(params.get_all("fq").collect::<Vec<_>>(), vec!["a:1", "b:2"]);
    }

    #[test]
    fn test_parse_decodes() {
        let params = QueryParams::parse("q=title%3A%22hello+world%22&x");
        assert_eq!(params.get("q"), Some(r#"title:"hello world""#));
        assert_eq!(params.get("x"), Some(""));
    }

    #[test]
    fn test_invalid_escape_kept_raw() {
        let params = QueryParams::parse("q=100%zz");
        assert_eq!(params.get("q"), Some("100%zz"));
    }

    #[test]
    fn test_empty_query_string() {
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("&&").is_empty());
    }

    #[test]
    fn test_flag() {
        let params = QueryParams::parse("facet=on&debug=false");
        assert!(params.flag("facet"));
        assert!(!params.flag("debug"));
        assert!(!params.flag("missing"));
    }

    #[test]
    fn test_field_param_override() {
        let params = QueryParams::parse("facet.limit=5&f.cat.facet.limit=2");
        assert_eq!(params.field_param("cat", "facet.limit"), Some("2"));
        assert_eq!(params.field_param("other", "facet.limit"), Some("5"));
    }

    #[test]
    fn test_echo_json() {
        let params: QueryParams = [("q", "x"), ("fq", "a"), ("fq", "b"), ("fq", "c")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_echo_json(),
            json!({ "q": "x", "fq": ["a", "b", "c"] })
        );
    }
}
