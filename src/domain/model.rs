use crate::utils::error::{IdentityError, Result};
use std::collections::HashSet;
use std::fmt;

pub const MAX_DOMAIN_LEN: usize = 255;
pub const WILDCARD_PREFIX: &str = "*.";

const FORBIDDEN_CHARS: [char; 4] = ['\'', '"', ';', '`'];

/// A domain that passed validation. Holds the raw value unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    /// Checks length first, then the explicitly dangerous characters, then
    /// the `[a-zA-Z0-9.-]` whitelist.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw.len() > MAX_DOMAIN_LEN {
            return Err(IdentityError::validation(format!(
                "Domain length must be 1-{} characters",
                MAX_DOMAIN_LEN
            )));
        }

        if raw.contains(FORBIDDEN_CHARS) {
            return Err(IdentityError::validation(format!(
                "Domain '{}' contains invalid characters (quotes, semicolon, backtick)",
                raw
            )));
        }

        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(IdentityError::validation(format!(
                "Domain '{}' must contain only alphanumeric, dot or hyphen",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn output_file_name(&self) -> String {
        format!("{}_identities.txt", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_wildcard(identity: &str) -> bool {
    identity.starts_with(WILDCARD_PREFIX)
}

/// Deduplicated identities, split into wildcard and normal names, each
/// sorted byte-wise ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySet {
    pub wildcards: Vec<String>,
    pub normal: Vec<String>,
}

impl IdentitySet {
    pub fn from_raw(raw: Vec<String>) -> Self {
        let unique = dedup_preserving_order(raw);

        let (mut wildcards, mut normal): (Vec<String>, Vec<String>) =
            unique.into_iter().partition(|id| is_wildcard(id));

        // String's Ord is byte-wise, which is what the output order requires.
        wildcards.sort_unstable();
        normal.sort_unstable();

        Self { wildcards, normal }
    }

    pub fn len(&self) -> usize {
        self.wildcards.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wildcards.is_empty() && self.normal.is_empty()
    }

    /// Wildcards first, then normal names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.wildcards
            .iter()
            .chain(self.normal.iter())
            .map(String::as_str)
    }

    /// One identity per line, each LF-terminated. Empty set renders as "".
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.iter().map(|id| id.len() + 1).sum());
        for id in self.iter() {
            out.push_str(id);
            out.push('\n');
        }
        out
    }
}

pub fn dedup_preserving_order(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// What a `load` produced.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub output_path: std::path::PathBuf,
    pub listing: String,
    pub wildcard_count: usize,
    pub normal_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_domain_accepts_plain_names() {
        for ok in ["example.com", "a", "sub-domain.example.co.uk", "EXAMPLE.COM", "123.45"] {
            let domain = Domain::parse(ok).unwrap();
            assert_eq!(domain.as_str(), ok);
        }
    }

    #[test]
    fn test_domain_length_limits() {
        assert!(Domain::parse("").is_err());
        assert!(Domain::parse(&"a".repeat(255)).is_ok());
        let err = Domain::parse(&"a".repeat(256)).unwrap_err();
        assert_eq!(err.to_string(), "Domain length must be 1-255 characters");
    }

    #[test]
    fn test_domain_rejects_dangerous_characters() {
        for bad in ["a'b.com", "a\"b.com", "a;b.com", "a`b.com"] {
            let err = Domain::parse(bad).unwrap_err();
            assert!(err.to_string().contains("quotes, semicolon, backtick"), "{}", bad);
        }
    }

    #[test]
    fn test_domain_rejects_outside_whitelist() {
        for bad in ["a b.com", "a/b", "*.a.com", "a_b.com", "ümlaut.de", "a%b", "a\nb"] {
            let err = Domain::parse(bad).unwrap_err();
            assert!(err.to_string().contains("only alphanumeric, dot or hyphen"), "{}", bad);
            assert_eq!(err.kind(), "ValidationError");
        }
    }

    #[test]
    fn test_output_file_name() {
        let domain = Domain::parse("example.com").unwrap();
        assert_eq!(domain.output_file_name(), "example.com_identities.txt");
    }

    #[test]
    fn test_identity_set_orders_wildcards_first() {
        let set = IdentitySet::from_raw(strings(&["*.b.com", "a.com", "a.com", "*.a.com", "b.com"]));
        let ordered: Vec<&str> = set.iter().collect();
        assert_eq!(ordered, vec!["*.a.com", "*.b.com", "a.com", "b.com"]);
        assert_eq!(set.render(), "*.a.com\n*.b.com\na.com\nb.com\n");
    }

    #[test]
    fn test_identity_set_empty() {
        let set = IdentitySet::from_raw(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.render(), "");
    }

    #[test]
    fn test_sort_is_bytewise() {
        let set = IdentitySet::from_raw(strings(&["b.com", "B.com", "a.com", "Z.com"]));
        assert_eq!(set.normal, strings(&["B.com", "Z.com", "a.com", "b.com"]));
    }

    #[test]
    fn test_wildcard_requires_dot_after_star() {
        let set = IdentitySet::from_raw(strings(&["*example.com", "*.example.com"]));
        assert_eq!(set.wildcards, strings(&["*.example.com"]));
        assert_eq!(set.normal, strings(&["*example.com"]));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let unique = dedup_preserving_order(strings(&["c", "a", "c", "b", "a"]));
        assert_eq!(unique, strings(&["c", "a", "b"]));
    }
}
