//! Environment mappings and precedence merging
//!
//! A mapping is an ordered name → value map. Merging is strictly key-wise
//! overwrite: the mapping applied later wins, nothing is concatenated and
//! merging never fails.

use std::collections::BTreeMap;

use crate::codec::validate_key;
use crate::error::{EnviError, EnviResult};

/// Variable name → value
pub type EnvMapping = BTreeMap<String, String>;

/// Overwrite `dst` with every entry of `src`
pub fn merge_into(dst: &mut EnvMapping, src: EnvMapping) {
    dst.extend(src);
}

/// Merge mappings in order; later mappings win
pub fn merge<I>(mappings: I) -> EnvMapping
where
    I: IntoIterator<Item = EnvMapping>,
{
    mappings.into_iter().fold(EnvMapping::new(), |mut acc, m| {
        merge_into(&mut acc, m);
        acc
    })
}

/// Split a raw `NAME=VALUE` environ entry on its first `=`
///
/// Entries without `=` or with an empty name yield `None`.
pub fn parse_environ_entry(entry: &str) -> Option<(&str, &str)> {
    match entry.split_once('=') {
        Some((name, value)) if !name.is_empty() => Some((name, value)),
        _ => None,
    }
}

/// Build a mapping from raw `NAME=VALUE` entries, skipping unparseable ones
pub fn mapping_from_environ<I, S>(entries: I) -> EnvMapping
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            parse_environ_entry(entry.as_ref())
                .map(|(name, value)| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// Flatten a mapping into `NAME=VALUE` strings for a child environment
pub fn to_environ(mapping: &EnvMapping) -> Vec<String> {
    mapping
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect()
}

/// Parse an inline `NAME:VALUE` override, split on the first `:`
///
/// Errors never echo the argument, which may hold a secret value.
pub fn parse_override(arg: &str) -> EnviResult<(String, String)> {
    let (name, value) = arg.split_once(':').ok_or_else(|| {
        EnviError::InvalidMapping("override must be NAME:VALUE, the ':' is missing".to_string())
    })?;

    if name.contains('=') {
        return Err(EnviError::InvalidMapping(
            "override name must not contain '='; use NAME:VALUE".to_string(),
        ));
    }
    validate_key(name).map_err(|e| EnviError::InvalidMapping(e.to_string()))?;

    Ok((name.to_string(), value.to_string()))
}

/// Parse a list of inline overrides; later duplicates win
pub fn parse_overrides<I, S>(args: I) -> EnviResult<EnvMapping>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| parse_override(arg.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> EnvMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_later_mapping_wins() {
        let merged = merge(vec![
            mapping(&[("A", "1"), ("B", "1")]),
            mapping(&[("A", "2")]),
        ]);
        assert_eq!(merged, mapping(&[("A", "2"), ("B", "1")]));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
        assert_eq!(
            merge(vec![EnvMapping::new(), mapping(&[("A", "1")]), EnvMapping::new()]),
            mapping(&[("A", "1")])
        );
    }

    #[test]
    fn test_merge_is_associative_over_ordered_application() {
        let m1 = mapping(&[("A", "1"), ("B", "1"), ("C", "1")]);
        let m2 = mapping(&[("B", "2"), ("D", "2")]);
        let m3 = mapping(&[("C", "3"), ("D", "3")]);

        let flat = merge(vec![m1.clone(), m2.clone(), m3.clone()]);
        let nested = merge(vec![merge(vec![m1.clone(), m2.clone()]), m3.clone()]);
        let right = merge(vec![m1, merge(vec![m2, m3])]);

        assert_eq!(flat, nested);
        assert_eq!(flat, right);
    }

    #[test]
    fn test_merge_does_not_concatenate() {
        let merged = merge(vec![mapping(&[("PATH", "/bin")]), mapping(&[("PATH", "/usr/bin")])]);
        assert_eq!(merged["PATH"], "/usr/bin");
    }

    #[test]
    fn test_environ_entry_split_on_first_equals() {
        assert_eq!(parse_environ_entry("FOO=bar=baz"), Some(("FOO", "bar=baz")));
        assert_eq!(parse_environ_entry("EMPTY="), Some(("EMPTY", "")));
        assert_eq!(parse_environ_entry("NO_EQUALS"), None);
        assert_eq!(parse_environ_entry("=value"), None);
    }

    #[test]
    fn test_mapping_from_environ() {
        let m = mapping_from_environ(["FOO=bar=baz", "HOME=/root", "junk"]);
        assert_eq!(m, mapping(&[("FOO", "bar=baz"), ("HOME", "/root")]));
    }

    #[test]
    fn test_to_environ_round_trips_through_parse() {
        let m = mapping(&[("A", "x=y"), ("B", "")]);
        let environ = to_environ(&m);
        assert_eq!(environ, vec!["A=x=y".to_string(), "B=".to_string()]);
        assert_eq!(mapping_from_environ(&environ), m);
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("URL:http://host:8080").unwrap(),
            ("URL".to_string(), "http://host:8080".to_string())
        );
        assert_eq!(
            parse_override("EMPTY:").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_override_rejects_bad_input() {
        assert!(matches!(
            parse_override("NO_SEPARATOR"),
            Err(EnviError::InvalidMapping(_))
        ));
        assert!(matches!(
            parse_override("A=B:value"),
            Err(EnviError::InvalidMapping(_))
        ));
    }

    #[test]
    fn test_parse_override_errors_hide_value() {
        for arg in ["API_KEY=sk-live-123", "API_KEY=sk-live-123:x", "sk-live-123"] {
            let err = parse_override(arg).unwrap_err();
            assert!(
                !err.to_string().contains("sk-live-123"),
                "error for {:?} leaks the value",
                arg
            );
        }
    }

    #[test]
    fn test_parse_overrides_later_wins() {
        let m = parse_overrides(["A:1", "A:2", "B:3"]).unwrap();
        assert_eq!(m, mapping(&[("A", "2"), ("B", "3")]));
    }
}
