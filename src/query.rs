//! The canonical sorted query model.
//!
//! Two URIs that differ only in query parameter order produce the same
//! [`ParsedQuery`] rendering, which is what makes SURT keys comparable.

use core::fmt;

/// One key of a parsed query together with its values.
///
/// A value of `None` records a token without `=` (`?flag`), which renders
/// differently from an empty value (`?flag=`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryEntry {
    key: String,
    values: Vec<Option<String>>,
}

impl QueryEntry {
    /// The entry's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The values recorded for the key, in sorted token order.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

/// An immutable, canonically ordered view of a query string.
///
/// Built by splitting the raw query on `&`, sorting the tokens
/// lexicographically and merging consecutive tokens that share a key.
/// Every mutator returns a new instance; iteration order and
/// [`Display`](fmt::Display) output are deterministic regardless of the
/// original parameter order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    entries: Vec<QueryEntry>,
}

impl ParsedQuery {
    /// Parses a raw (undecoded) query string.
    pub fn parse(raw: &str) -> ParsedQuery {
        if raw.is_empty() {
            return ParsedQuery::default();
        }
        let mut tokens: Vec<&str> = raw.split('&').collect();
        tokens.sort_unstable();

        let mut entries: Vec<QueryEntry> = Vec::new();
        for token in tokens {
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, Some(v.to_owned())),
                None => (token, None),
            };
            match entries.last_mut() {
                Some(last) if last.key == key => last.values.push(value),
                _ => entries.push(QueryEntry {
                    key: key.to_owned(),
                    values: vec![value],
                }),
            }
        }
        ParsedQuery { entries }
    }

    /// The number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the query holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in canonical order.
    pub fn entries(&self) -> &[QueryEntry] {
        &self.entries
    }

    /// Returns the entry for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&QueryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns a new query with `key` bound to exactly `value`.
    pub fn put(&self, key: &str, value: Option<&str>) -> ParsedQuery {
        let mut tokens = self.tokens_without(key);
        tokens.push(token_of(key, value));
        ParsedQuery::from_tokens(tokens)
    }

    /// Returns a new query with `value` appended to `key`'s values.
    pub fn add(&self, key: &str, value: Option<&str>) -> ParsedQuery {
        let mut tokens = self.tokens();
        tokens.push(token_of(key, value));
        ParsedQuery::from_tokens(tokens)
    }

    /// Returns a new query with every value of `key` removed.
    pub fn remove(&self, key: &str) -> ParsedQuery {
        ParsedQuery::from_tokens(self.tokens_without(key))
    }

    fn from_tokens(mut tokens: Vec<String>) -> ParsedQuery {
        tokens.sort_unstable();
        let joined = tokens.join("&");
        ParsedQuery::parse(&joined)
    }

    fn tokens(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.values.iter().map(|v| token_of(&e.key, v.as_deref())))
            .collect()
    }

    fn tokens_without(&self, key: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.key != key)
            .flat_map(|e| e.values.iter().map(|v| token_of(&e.key, v.as_deref())))
            .collect()
    }
}

fn token_of(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{key}={v}"),
        None => key.to_owned(),
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            for value in &entry.values {
                if !first {
                    f.write_str("&")?;
                }
                first = false;
                match value {
                    Some(v) => write!(f, "{}={}", entry.key, v)?,
                    None => f.write_str(&entry.key)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_tokens() {
        let q = ParsedQuery::parse("b=1&a=1");
        assert_eq!(q.to_string(), "a=1&b=1");
        assert_eq!(ParsedQuery::parse("a=1&b=1"), q);
    }

    #[test]
    fn merges_duplicate_keys() {
        let q = ParsedQuery::parse("a=2&b=0&a=1");
        assert_eq!(q.len(), 2);
        assert_eq!(
            q.get("a").unwrap().values(),
            [Some("1".to_owned()), Some("2".to_owned())]
        );
        assert_eq!(q.to_string(), "a=1&a=2&b=0");
    }

    #[test]
    fn keeps_valueless_tokens() {
        let q = ParsedQuery::parse("b&a");
        assert_eq!(q.to_string(), "a&b");
        assert_eq!(q.get("a").unwrap().values(), [None]);
        // An empty value is distinct from no value.
        assert_eq!(ParsedQuery::parse("a=").to_string(), "a=");
    }

    #[test]
    fn mutators_are_persistent() {
        let q = ParsedQuery::parse("a=1&b=2");
        let with_c = q.add("c", Some("3"));
        assert_eq!(q.to_string(), "a=1&b=2");
        assert_eq!(with_c.to_string(), "a=1&b=2&c=3");

        let replaced = with_c.put("a", Some("9"));
        assert_eq!(replaced.to_string(), "a=9&b=2&c=3");

        let removed = replaced.remove("b");
        assert_eq!(removed.to_string(), "a=9&c=3");
        assert!(!removed.contains("b"));
    }
}
