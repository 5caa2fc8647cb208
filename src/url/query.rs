//! Query-string encoding and decoding.
//!
//! A query map is flattened into `key=value` pairs joined by `&`. Values form
//! a closed set — a scalar or a list — so they are modeled as [`QueryValue`]
//! rather than an open "any" type. List values use the `key[]=` convention,
//! one pair per element.
//!
//! No percent-encoding is performed in either direction; callers are
//! responsible for supplying already-safe values.

use std::collections::HashMap;

/// A single query parameter value.
///
/// # Examples
///
/// ```
/// use nautilus::url::QueryValue;
///
/// let scalar = QueryValue::from("hi");
/// let list = QueryValue::from(vec!["x", "y"]);
///
/// assert_eq!(scalar, QueryValue::Scalar("hi".into()));
/// assert_eq!(list, QueryValue::List(vec!["x".into(), "y".into()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value, emitted as `key=value`.
    Scalar(String),
    /// A multi-valued parameter, emitted as `key[]=value` once per element.
    List(Vec<String>),
}

/// Caller-supplied mapping from parameter name to value, used only as
/// encoder input. Key iteration order is unspecified.
pub type QueryMap = HashMap<String, QueryValue>;

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_owned).collect())
    }
}

/// Flattens a [`QueryMap`] into a query string without the leading `?`.
///
/// Scalars emit `key=value`; lists emit `key[]=element` in element order.
/// Pairs are joined with `&`. Key order follows map iteration order and is
/// not guaranteed to be stable.
///
/// # Examples
///
/// ```
/// use nautilus::url::{QueryMap, encode_query};
///
/// let mut params = QueryMap::new();
/// params.insert("q".into(), "hi".into());
///
/// assert_eq!(encode_query(&params), "q=hi");
/// ```
pub fn encode_query(params: &QueryMap) -> String {
    let mut out = String::new();

    for (key, value) in params {
        match value {
            QueryValue::Scalar(v) => {
                out.push('&');
                out.push_str(key);
                out.push('=');
                out.push_str(v);
            }
            QueryValue::List(items) => {
                for v in items {
                    out.push('&');
                    out.push_str(key);
                    out.push_str("[]=");
                    out.push_str(v);
                }
            }
        }
    }

    // Drop the separator artifact in front of the first pair.
    if out.starts_with('&') {
        out.remove(0);
    }
    out
}

/// Parses a raw query string (`key=value&key2=value2`) into a map.
///
/// `+` is decoded as a space in both keys and values. Repeated `key[]` pairs
/// collect into a [`QueryValue::List`] in input order; a plain key binds a
/// [`QueryValue::Scalar`], last occurrence winning. Pairs with an empty key
/// are skipped.
pub fn parse_query(raw: &str) -> HashMap<String, QueryValue> {
    let mut params = HashMap::new();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("").replace('+', " ");
        let value = parts.next().unwrap_or("").replace('+', " ");
        if key.is_empty() {
            continue;
        }

        match key.strip_suffix("[]") {
            Some(list_key) => {
                let entry = params
                    .entry(list_key.to_owned())
                    .or_insert_with(|| QueryValue::List(Vec::new()));
                // A plain key seen earlier is superseded by the list form.
                if matches!(entry, QueryValue::Scalar(_)) {
                    *entry = QueryValue::List(Vec::new());
                }
                if let QueryValue::List(items) = entry {
                    items.push(value);
                }
            }
            None => {
                params.insert(key, QueryValue::Scalar(value));
            }
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_scalar_and_list() {
        let mut params = QueryMap::new();
        params.insert("tags".into(), vec!["x", "y"].into());
        params.insert("q".into(), "hi".into());

        let encoded = encode_query(&params);
        let pairs: Vec<&str> = encoded.split('&').collect();

        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&"tags[]=x"));
        assert!(pairs.contains(&"tags[]=y"));
        assert!(pairs.contains(&"q=hi"));
        assert!(!encoded.starts_with('&'));
    }

    #[test]
    fn encode_preserves_list_order() {
        let mut params = QueryMap::new();
        params.insert("id".into(), vec!["3", "1", "2"].into());
        assert_eq!(encode_query(&params), "id[]=3&id[]=1&id[]=2");
    }

    #[test]
    fn encode_empty_map() {
        assert_eq!(encode_query(&QueryMap::new()), "");
    }

    #[test]
    fn encode_numeric_and_bool_scalars() {
        let mut params = QueryMap::new();
        params.insert("active".into(), true.into());
        let encoded = encode_query(&params);
        assert_eq!(encoded, "active=true");

        let mut params = QueryMap::new();
        params.insert("page".into(), 2i64.into());
        assert_eq!(encode_query(&params), "page=2");
    }

    #[test]
    fn parse_scalars() {
        let params = parse_query("q=rust&page=2");
        assert_eq!(params.get("q"), Some(&QueryValue::Scalar("rust".into())));
        assert_eq!(params.get("page"), Some(&QueryValue::Scalar("2".into())));
    }

    #[test]
    fn parse_list_convention() {
        let params = parse_query("tags[]=x&tags[]=y&q=hi");
        assert_eq!(
            params.get("tags"),
            Some(&QueryValue::List(vec!["x".into(), "y".into()]))
        );
        assert_eq!(params.get("q"), Some(&QueryValue::Scalar("hi".into())));
    }

    #[test]
    fn parse_plus_as_space() {
        let params = parse_query("name=John+Doe");
        assert_eq!(
            params.get("name"),
            Some(&QueryValue::Scalar("John Doe".into()))
        );
    }

    #[test]
    fn parse_missing_value_and_empty_pairs() {
        let params = parse_query("flag&&x=1");
        assert_eq!(params.get("flag"), Some(&QueryValue::Scalar("".into())));
        assert_eq!(params.get("x"), Some(&QueryValue::Scalar("1".into())));
    }

    #[test]
    fn parse_list_supersedes_scalar() {
        let params = parse_query("a=1&a[]=2");
        assert_eq!(params.get("a"), Some(&QueryValue::List(vec!["2".into()])));
    }

    #[test]
    fn round_trip_pairs_survive() {
        let mut params = QueryMap::new();
        params.insert("tags".into(), vec!["x", "y"].into());
        params.insert("q".into(), "hi".into());

        let reparsed = parse_query(&encode_query(&params));
        assert_eq!(reparsed.get("q"), params.get("q"));
        assert_eq!(reparsed.get("tags"), params.get("tags"));
    }
}
