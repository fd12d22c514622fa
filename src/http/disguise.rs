//! Header disguise mapping
//!
//! Some upstream media hosts block or alter responses based on standard
//! request headers. Callers describe the headers they want with their real
//! names; before the request leaves the client those names are swapped for
//! masked `custom-*` names. The transport may swap them back at the wire.

use std::collections::BTreeMap;

/// Canonical header name to masked header name.
///
/// Static for the lifetime of the process. No two canonical names share a
/// masked name.
pub const DISGUISE_TABLE: &[(&str, &str)] = &[
    ("cookie", "custom-cookie"),
    ("origin", "custom-origin"),
    ("host", "custom-host"),
    ("connection", "custom-connection"),
    ("user-agent", "custom-ua"),
    ("referer", "custom-referer"),
    ("redirect", "custom-redirect"),
];

/// Case-insensitive header map. Keys are stored lower-cased, so exactly one
/// casing survives per logical header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs. When two names differ only by case the
    /// later pair wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (name, value) in pairs {
            set.insert(name.as_ref(), value);
        }
        set
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.to_ascii_lowercase(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Extend<(String, String)> for HeaderSet {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(&name, value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl IntoIterator for HeaderSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Masked name for a canonical header, if the header is disguised
pub fn masked_name(canonical: &str) -> Option<&'static str> {
    DISGUISE_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(canonical))
        .map(|(_, masked)| *masked)
}

/// Canonical name for a masked header, if it is one of ours
pub fn canonical_name(masked: &str) -> Option<&'static str> {
    DISGUISE_TABLE
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(masked))
        .map(|(canonical, _)| *canonical)
}

/// Rename every canonical header to its masked name. Values are preserved and
/// unmatched headers pass through lower-cased.
///
/// If the input already carries a masked name alongside its canonical one
/// (`Cookie` and `custom-cookie`), the canonical value wins and the result
/// holds one header fewer.
pub fn mask(headers: &HeaderSet) -> HeaderSet {
    rename(headers, masked_name)
}

/// Inverse of [`mask`]: masked names go back to their canonical names.
pub fn reveal(headers: &HeaderSet) -> HeaderSet {
    rename(headers, canonical_name)
}

fn rename(headers: &HeaderSet, lookup: fn(&str) -> Option<&'static str>) -> HeaderSet {
    let mut renamed = headers.clone();
    // Scan the whole input before writing so the result does not depend on
    // key order.
    let moves: Vec<(&str, &'static str)> = headers
        .iter()
        .filter_map(|(name, _)| lookup(name).map(|target| (name, target)))
        .collect();

    for (from, to) in moves {
        if let Some(value) = renamed.remove(from) {
            renamed.insert(to, value);
        }
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_masked_names_are_unique() {
        let masked: HashSet<_> = DISGUISE_TABLE.iter().map(|(_, m)| *m).collect();
        assert_eq!(masked.len(), DISGUISE_TABLE.len());

        let canonical: HashSet<_> = DISGUISE_TABLE.iter().map(|(c, _)| *c).collect();
        assert!(canonical.is_disjoint(&masked));
    }

    #[test]
    fn test_mask_collision_keeps_canonical_value() {
        let headers = HeaderSet::from_pairs([("Cookie", "real=1"), ("custom-cookie", "stale=0")]);
        let masked = mask(&headers);

        assert_eq!(masked.len(), 1);
        assert_eq!(masked.get("custom-cookie"), Some("real=1"));
        assert!(!masked.contains("cookie"));
    }

    #[test]
    fn test_header_set_normalizes_case() {
        let set = HeaderSet::from_pairs([("Content-Type", "a"), ("CONTENT-TYPE", "b")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("content-type"), Some("b"));
        assert_eq!(set.get("Content-Type"), Some("b"));
    }

    #[test]
    fn test_mask_renames_disguised_headers() {
        let headers = HeaderSet::from_pairs([
            ("Cookie", "session=1"),
            ("User-Agent", "Mozilla/5.0"),
            ("Referer", "https://site.test/"),
            ("Accept", "*/*"),
        ]);

        let masked = mask(&headers);

        assert_eq!(masked.len(), headers.len());
        assert_eq!(masked.get("custom-cookie"), Some("session=1"));
        assert_eq!(masked.get("custom-ua"), Some("Mozilla/5.0"));
        assert_eq!(masked.get("custom-referer"), Some("https://site.test/"));
        assert_eq!(masked.get("accept"), Some("*/*"));
        for (canonical, _) in DISGUISE_TABLE {
            assert!(!masked.contains(canonical), "{canonical} should be masked");
        }
    }

    #[test]
    fn test_mask_covers_every_table_entry() {
        let headers: HeaderSet = DISGUISE_TABLE
            .iter()
            .map(|(canonical, _)| (canonical.to_uppercase(), format!("v-{canonical}")))
            .collect();

        let masked = mask(&headers);

        assert_eq!(masked.len(), DISGUISE_TABLE.len());
        for (canonical, target) in DISGUISE_TABLE {
            assert_eq!(masked.get(target), Some(format!("v-{canonical}").as_str()));
        }
    }

    #[test]
    fn test_mask_is_repeatable() {
        let headers = HeaderSet::from_pairs([("Host", "cdn.test"), ("X-Token", "t")]);
        assert_eq!(mask(&headers), mask(&headers));
    }

    #[test]
    fn test_reveal_restores_canonical_names() {
        let headers = HeaderSet::from_pairs([
            ("Origin", "https://a.test"),
            ("Connection", "keep-alive"),
            ("x-other", "1"),
        ]);
        assert_eq!(reveal(&mask(&headers)), headers);
    }

    #[test]
    fn test_empty_set_stays_empty() {
        assert!(mask(&HeaderSet::new()).is_empty());
    }
}
