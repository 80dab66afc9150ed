//! Case-insensitive header storage.
//!
//! Names are lower-cased before they are stored or looked up, so a map never
//! holds two entries that differ only by case. Appending to a name that is
//! already present merges the values with `", "`, which is how repeated
//! request headers are folded into a single field.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map;

/// Mapping from lower-cased header name to its (possibly merged) value.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { inner: HashMap::with_capacity(capacity) }
    }

    /// Returns the value stored for `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&*normalize(name)).map(String::as_str)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.inner.contains_key(&*normalize(name))
    }

    /// Stores `value` under the lower-cased `name`, replacing any previous value.
    pub fn set<V: Into<String>>(&mut self, name: &str, value: V) {
        self.inner.insert(normalize(name).into_owned(), value.into());
    }

    /// Stores `value` under the lower-cased `name`, joining it to an existing
    /// value with `", "`.
    pub fn append<V: AsRef<str>>(&mut self, name: &str, value: V) {
        let value = value.as_ref();
        match self.inner.entry(normalize(name).into_owned()) {
            hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.reserve(value.len() + 2);
                existing.push_str(", ");
                existing.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(&*normalize(name))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.inner.iter() }
    }
}

fn normalize(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Iterator over `(name, value)` pairs of a [`HeaderMap`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a map with the merge rule applied to repeated names.
impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.append(name.as_ref(), value);
        }
        map
    }
}
