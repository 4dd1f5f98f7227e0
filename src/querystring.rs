//! Query-string mutation: copy the current query parameters, override some keys, re-encode.
//!
//! Used by the `url_with_param` template helper, e.g. `{{url_with_param page=3}}`
//! renders `?sort=name&page=3` when the current query string is `?sort=name&page=1`.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0}")]
pub struct TemplateSyntaxError(pub String);

/// Parse helper arguments of the form `key=value` into (key, value-expression) pairs.
/// The value half is an expression to be resolved against the render context.
pub fn parse_changes<'a, I>(bits: I) -> Result<Vec<(String, String)>, TemplateSyntaxError>
where
    I: IntoIterator<Item = &'a str>,
{
    bits.into_iter()
        .map(|bit| {
            bit.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| TemplateSyntaxError("Argument syntax wrong: should be key=value".into()))
        })
        .collect()
}

/// Merge `changes` over `current` and encode the result as `?k=v&...`.
///
/// Existing keys keep their position and take the new value; new keys are appended in the
/// order given. Repeated keys in `current` collapse to their last value.
pub fn url_with_param(current: &[(String, String)], changes: &[(String, String)]) -> String {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(current.len() + changes.len());
    for (key, value) in current.iter().chain(changes.iter()) {
        match merged.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    let quoted: Vec<String> = merged
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("?{}", quoted.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn overrides_existing_and_appends_new() {
        let out = url_with_param(&pairs(&[("a", "1"), ("b", "2")]), &pairs(&[("b", "3"), ("c", "4")]));
        assert_eq!(out, "?a=1&b=3&c=4");
    }

    #[test]
    fn keys_and_values_are_percent_encoded() {
        let out = url_with_param(&pairs(&[("q", "a b&c")]), &pairs(&[("sort key", "é")]));
        assert_eq!(out, "?q=a%20b%26c&sort%20key=%C3%A9");
    }

    #[test]
    fn empty_query_and_no_changes() {
        assert_eq!(url_with_param(&[], &[]), "?");
    }

    #[test]
    fn argument_parsing() {
        let parsed = parse_changes(["page=n", "sort=a=b"]).unwrap();
        assert_eq!(parsed, pairs(&[("page", "n"), ("sort", "a=b")]));
        let err = parse_changes(["page"]).unwrap_err();
        assert_eq!(err.to_string(), "Argument syntax wrong: should be key=value");
    }
}
