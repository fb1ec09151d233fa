//! The flattened multi-valued mapping.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::ser::encode::{Encoding, encode_into};

/// A flat mapping from query keys to one or more values.
///
/// Keys are kept in lexicographic order, so iteration and
/// [`encode`](UrlValues::encode) are canonical regardless of the order in
/// which entries were added. Values under a key keep their insertion
/// order and are never deduplicated.
///
/// ```
/// use url_values::UrlValues;
///
/// let mut values = UrlValues::new();
/// values.add("page", "2");
/// values.add("tag", "a b");
/// values.add("tag", "c");
/// assert_eq!(values.get("tag"), Some("a b"));
/// assert_eq!(values.encode(), "page=2&tag=a+b&tag=c");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlValues {
    entries: BTreeMap<String, Vec<String>>,
}

impl UrlValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value under `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Merges `other` into `self`, prefixing each of its keys with
    /// `prefix.`. Values under colliding keys are appended.
    pub fn extend_prefixed(&mut self, prefix: &str, other: UrlValues) {
        for (key, mut values) in other.entries {
            let key = format!("{prefix}.{key}");
            self.entries.entry(key).or_default().append(&mut values);
        }
    }

    /// Encodes the mapping as a canonical query string using
    /// [`Encoding::Query`].
    pub fn encode(&self) -> String {
        self.encode_with(Encoding::Query)
    }

    /// Encodes the mapping as a query string: keys in ascending order,
    /// one `key=value` pair per stored value, joined with `&`.
    pub fn encode_with(&self, encoding: Encoding) -> String {
        let mut out = String::with_capacity(self.entries.len() * 16);
        for (key, value) in self.pairs() {
            if !out.is_empty() {
                out.push('&');
            }
            encode_into(&mut out, key.as_bytes(), encoding);
            out.push('=');
            encode_into(&mut out, value.as_bytes(), encoding);
        }
        out
    }

    /// Every `(key, value)` pair in encoding order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }
}

impl fmt::Display for UrlValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Iterator over the keys of a [`UrlValues`] and the values under each,
/// returned by [`UrlValues::iter`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Vec<String>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a UrlValues {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for UrlValues {
    type Item = (String, Vec<String>);
    type IntoIter = btree_map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UrlValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = UrlValues::new();
        values.extend(iter);
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for UrlValues {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}
