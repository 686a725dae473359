// FortiRep - core/fields.rs
//
// FortiGate log line tokenizer and field access.
//
// A log line is a sequence of `key=value` and `key="quoted value"` tokens
// separated by whitespace. Different event subtypes carry different key
// sets, and key naming drifted across firmware versions, so all downstream
// field access goes through FieldSpec: an ordered list of candidate keys
// plus a literal default. Which candidate resolved is observable (ranked
// tables exclude rows whose label fell through to the default).

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// `key=value` / `key="quoted value"` token pattern. Keys are `\w+`;
/// values are either the contents of a double-quoted span (may contain
/// spaces) or a maximal run of non-whitespace characters.
fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(\w+)=(?:"([^"]*)"|(\S+))"#).expect("hard-coded token regex must compile")
    })
}

/// The field set parsed from one log line.
///
/// Key presence varies line to line; values are always strings. Duplicate
/// keys on one line resolve to the last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: HashMap<String, String>,
}

impl FieldMap {
    /// Tokenize one raw line.
    ///
    /// Returns `None` for blank lines, `#`-prefixed comment lines, and
    /// lines containing no `key=value` token at all. Malformed lines are
    /// skipped silently by policy: firewall exports routinely contain
    /// stray banner or truncated lines and a single one must never abort
    /// a batch.
    pub fn parse(line: &str) -> Option<FieldMap> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let mut fields = HashMap::new();
        for caps in token_regex().captures_iter(trimmed) {
            let key = &caps[1];
            // Group 2 is the quoted form, group 3 the bare form.
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or("");
            // Last occurrence of a repeated key wins.
            fields.insert(key.to_string(), value.to_string());
        }

        if fields.is_empty() {
            return None;
        }
        Some(FieldMap { fields })
    }

    /// Look up a field by exact key name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Number of distinct keys on the line.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Re-serialize to `key="value"` token text.
    ///
    /// Tokens are emitted in sorted key order so the output is
    /// deterministic; parsing the result yields an equal FieldMap.
    pub fn to_line(&self) -> String {
        let mut tokens: Vec<String> = self
            .fields
            .iter()
            .map(|(key, value)| format!(r#"{key}="{value}""#))
            .collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }
}

// =============================================================================
// Field resolution
// =============================================================================

/// One logical attribute and its resolution chain: candidate keys tried in
/// order, then a literal default.
///
/// Presence beats emptiness: a key present with an empty value resolves to
/// that empty value, not to the next candidate or the default. This
/// mirrors how the reports have always counted events whose field was
/// logged but blank.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Logical attribute name (stable identifier, used as CSV/report header key).
    pub name: &'static str,
    /// Candidate log keys, most specific first.
    pub keys: &'static [&'static str],
    /// Literal fallback when no candidate key is present.
    pub default: &'static str,
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        keys: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        FieldSpec {
            name,
            keys,
            default,
        }
    }

    /// Resolve against a FieldMap. `None` means every candidate was absent
    /// and the caller is looking at the default.
    pub fn resolve<'a>(&self, fields: &'a FieldMap) -> Option<&'a str> {
        self.keys.iter().find_map(|key| fields.get(key))
    }

    /// Resolve, falling through to the default literal.
    pub fn resolve_or_default<'a>(&self, fields: &'a FieldMap) -> &'a str {
        self.resolve(fields).unwrap_or(self.default)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_and_bare_values() {
        let map = FieldMap::parse(
            r#"date=2025-06-01 time=08:00:00 subtype=webfilter url="bad.example" msg="URL was blocked""#,
        )
        .unwrap();
        assert_eq!(map.get("date"), Some("2025-06-01"));
        assert_eq!(map.get("subtype"), Some("webfilter"));
        assert_eq!(map.get("url"), Some("bad.example"));
        assert_eq!(map.get("msg"), Some("URL was blocked"));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn quoted_value_preserves_internal_spaces() {
        let map = FieldMap::parse(r#"attack="SQL Injection Attempt" severity=high"#).unwrap();
        assert_eq!(map.get("attack"), Some("SQL Injection Attempt"));
    }

    #[test]
    fn empty_quoted_value_is_present() {
        let map = FieldMap::parse(r#"user="" srcip=10.0.0.1"#).unwrap();
        assert_eq!(map.get("user"), Some(""));
    }

    #[test]
    fn blank_line_yields_none() {
        assert!(FieldMap::parse("").is_none());
        assert!(FieldMap::parse("   \t  ").is_none());
    }

    #[test]
    fn comment_line_yields_none() {
        assert!(FieldMap::parse("# exported 2025-06-01 by admin").is_none());
        assert!(FieldMap::parse("   # indented comment").is_none());
    }

    #[test]
    fn line_without_pairs_yields_none() {
        assert!(FieldMap::parse("--- log rotation marker ---").is_none());
        assert!(FieldMap::parse("garbage without equals").is_none());
    }

    #[test]
    fn repeated_key_last_occurrence_wins() {
        let map = FieldMap::parse("action=pass action=block").unwrap();
        assert_eq!(map.get("action"), Some("block"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unknown_key_returns_none() {
        let map = FieldMap::parse("srcip=10.0.0.1").unwrap();
        assert_eq!(map.get("dstip"), None);
    }

    #[test]
    fn parsing_same_line_twice_is_identical() {
        let line = r#"date=2025-06-01 time=08:00:00 srcip=10.0.0.5 url="bad.example" cat=63"#;
        assert_eq!(FieldMap::parse(line).unwrap(), FieldMap::parse(line).unwrap());
    }

    #[test]
    fn reserialized_line_parses_back_equal() {
        let map = FieldMap::parse(
            r#"date=2025-06-01 time=08:00:00 user="" msg="URL was blocked" srcip=10.0.0.5"#,
        )
        .unwrap();
        assert_eq!(FieldMap::parse(&map.to_line()).unwrap(), map);
    }

    #[test]
    fn resolver_prefers_primary_key() {
        let spec = FieldSpec::new("destip", &["dstip", "dst", "destip"], "N/A");
        let map = FieldMap::parse("dstip=192.0.2.1 dst=192.0.2.2").unwrap();
        assert_eq!(spec.resolve_or_default(&map), "192.0.2.1");
    }

    #[test]
    fn resolver_falls_back_to_synonym_not_default() {
        let spec = FieldSpec::new("destip", &["dstip", "dst", "destip"], "N/A");
        let map = FieldMap::parse("dst=192.0.2.2 srcip=10.0.0.1").unwrap();
        assert_eq!(spec.resolve(&map), Some("192.0.2.2"));
    }

    #[test]
    fn resolver_defaults_when_no_candidate_present() {
        let spec = FieldSpec::new("destip", &["dstip", "dst", "destip"], "N/A");
        let map = FieldMap::parse("srcip=10.0.0.1").unwrap();
        assert_eq!(spec.resolve(&map), None);
        assert_eq!(spec.resolve_or_default(&map), "N/A");
    }

    #[test]
    fn resolver_present_empty_value_beats_default() {
        let spec = FieldSpec::new("url", &["url"], "-");
        let map = FieldMap::parse(r#"url="" srcip=10.0.0.1"#).unwrap();
        assert_eq!(spec.resolve(&map), Some(""));
    }
}
