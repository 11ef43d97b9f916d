//! Turns key / multi-value collections into [`Params`] entries.
//!
//! Query strings, url-encoded bodies and multipart text fields all share the
//! same shape: a key may appear many times. HTML's array convention decides
//! what survives:
//!
//! ```text
//! <input name="tag[]">  <input name="tag[]">   →  tag  = List([a, b])
//! <input name="tag">    <input name="tag">     →  tag  = Text(a)
//! ```

use std::collections::HashMap;

use crate::params::{Params, Value};

const ARRAY_SUFFIX: &str = "[]";

/// Every value seen for each key, in arrival order.
pub type Values = HashMap<String, Vec<String>>;

/// Groups `(key, value)` pairs by key, keeping per-key order.
pub fn group<I>(pairs: I) -> Values
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut values = Values::new();
    for (key, value) in pairs {
        values.entry(key).or_default().push(value);
    }
    values
}

/// Decodes an `application/x-www-form-urlencoded` payload (a query string or
/// a form body) into grouped values.
pub fn parse_urlencoded(input: &[u8]) -> Result<Values, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)?;
    Ok(group(pairs))
}

/// Merges `values` into `params` and returns it for chaining.
///
/// Keys ending in `[]` lose the suffix and keep every value as a
/// [`Value::List`]. Other keys keep only their first value as a
/// [`Value::Text`].
pub fn extract(values: Values, mut params: Params) -> Params {
    for (key, mut vals) in values {
        if let Some(stripped) = key.strip_suffix(ARRAY_SUFFIX) {
            params.insert(stripped, Value::List(vals));
        } else if !vals.is_empty() {
            params.insert(key, Value::Text(vals.swap_remove(0)));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn bare_key_keeps_first_value() {
        let values = group(pairs(&[("k", "1"), ("k", "2"), ("k", "3")]));
        let params = extract(values, Params::new());

        assert_eq!(params.get("k"), Some(&Value::Text("1".into())));
    }

    #[test]
    fn array_key_keeps_every_value_in_order() {
        let values = group(pairs(&[("tag[]", "b"), ("other", "x"), ("tag[]", "a"), ("tag[]", "c")]));
        let params = extract(values, Params::new());

        assert_eq!(
            params.get("tag"),
            Some(&Value::List(vec!["b".into(), "a".into(), "c".into()])),
        );
        assert!(!params.contains_key("tag[]"));
        assert_eq!(params.text("other"), Some("x"));
    }

    #[test]
    fn extraction_overwrites_existing_entries() {
        let mut params = Params::new();
        params.insert("k", Value::Text("1".into()));
        params.insert("keep", Value::Text("yes".into()));

        let params = extract(group(pairs(&[("k", "8")])), params);

        assert_eq!(params.text("k"), Some("8"));
        assert_eq!(params.text("keep"), Some("yes"));
    }

    #[test]
    fn urlencoded_decodes_escapes() {
        let values = parse_urlencoded(b"param=not+an+int&name=a%26b&ids[]=1&ids[]=2").unwrap();
        let params = extract(values, Params::new());

        assert_eq!(params.text("param"), Some("not an int"));
        assert_eq!(params.text("name"), Some("a&b"));
        assert_eq!(params.list("ids"), Some(vec!["1", "2"]));
    }

    #[test]
    fn percent_encoded_brackets_are_array_notation() {
        let values = parse_urlencoded(b"ids%5B%5D=1&ids%5B%5D=2").unwrap();
        let params = extract(values, Params::new());

        assert_eq!(params.list("ids"), Some(vec!["1", "2"]));
    }

    #[test]
    fn empty_input_yields_nothing() {
        let params = extract(parse_urlencoded(b"").unwrap(), Params::new());
        assert!(params.is_empty());
    }
}
