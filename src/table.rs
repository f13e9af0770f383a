//! The implementor data model: [`ImplementorEntry`] and
//! [`ImplementorTable`].
//!
//! A table is what the documentation generator emits for one page load:
//! for each library that contributes implementors of the page's trait,
//! the ordered, pre-rendered markup describing each implementing type.
//! Order is display order and comes from the producer; these types never
//! sort, dedup, or otherwise rearrange it.

use alloc::{string::String, vec::Vec};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// The implementors recorded for a single library.
///
/// An entry pairs a namespaced library identifier with the ordered
/// markup descriptions of the types in that library which implement the
/// trait of the current page. The description sequence may be empty,
/// which means "library present, no implementors recorded" and is a
/// valid state rather than an error.
///
/// # Examples
///
/// ```
/// use implementors::ImplementorEntry;
///
/// let mut entry = ImplementorEntry::new("alloc", ["<code>Box&lt;T&gt;</code>"]);
/// entry.push("<code>Vec&lt;T&gt;</code>");
///
/// assert_eq!(entry.key(), "alloc");
/// assert_eq!(entry.implementors().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplementorEntry {
    key: String,
    implementors: Vec<String>,
}

impl ImplementorEntry {
    /// Creates an entry for `key` with the given implementor
    /// descriptions, in the given order.
    ///
    /// # Examples
    ///
    /// ```
    /// use implementors::ImplementorEntry;
    ///
    /// let entry = ImplementorEntry::new("libA", ["implA1", "implA2"]);
    /// assert_eq!(entry.implementors(), ["implA1", "implA2"]);
    ///
    /// let empty = ImplementorEntry::new("libB", [] as [&str; 0]);
    /// assert!(empty.implementors().is_empty());
    /// ```
    pub fn new<K, I>(key: K, implementors: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            key: key.into(),
            implementors: implementors.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends one implementor description at the end of the sequence.
    pub fn push(&mut self, markup: impl Into<String>) {
        self.implementors.push(markup.into());
    }

    /// The namespaced library identifier this entry belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The implementor descriptions, in producer order.
    pub fn implementors(&self) -> &[String] {
        &self.implementors
    }

    /// Splits the entry into its identifier and description sequence.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.key, self.implementors)
    }
}

/// An insertion-ordered map from library identifier to implementor
/// descriptions.
///
/// This is the value handed from the payload producer to the page
/// renderer. Keys are unique and iterate in the order the producer
/// supplied them; the descriptions under each key likewise keep their
/// supplied order. An empty table is valid and must still be delivered
/// to the consumer.
///
/// # Examples
///
/// ```
/// use implementors::{ImplementorEntry, ImplementorTable};
///
/// let mut table = ImplementorTable::new();
/// table.insert(ImplementorEntry::new("libA", ["x"]));
/// table.insert(ImplementorEntry::new("libB", ["y", "z"]));
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get("libB"), Some(&["y".to_string(), "z".to_string()][..]));
/// assert_eq!(table.keys().collect::<Vec<_>>(), ["libA", "libB"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImplementorTable {
    libraries: IndexMap<String, Vec<String>, FxBuildHasher>,
}

impl ImplementorTable {
    /// Creates a new, empty table.
    pub const fn new() -> Self {
        Self {
            libraries: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    /// Returns the number of libraries recorded in the table.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Returns `true` if no libraries are recorded.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Inserts an entry, keyed by the entry's library identifier.
    ///
    /// If the key is already present, the new descriptions replace the
    /// old ones (last write wins), the key keeps its original position,
    /// and the replaced entry is returned. Otherwise the entry is
    /// appended after all existing keys and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use implementors::{ImplementorEntry, ImplementorTable};
    ///
    /// let mut table = ImplementorTable::new();
    /// assert_eq!(table.insert(ImplementorEntry::new("libA", ["old"])), None);
    ///
    /// let replaced = table.insert(ImplementorEntry::new("libA", ["new"]));
    /// assert_eq!(replaced, Some(ImplementorEntry::new("libA", ["old"])));
    /// assert_eq!(table.get("libA"), Some(&["new".to_string()][..]));
    /// ```
    pub fn insert(&mut self, entry: ImplementorEntry) -> Option<ImplementorEntry> {
        let (key, implementors) = entry.into_parts();
        let previous = self.libraries.insert(key.clone(), implementors)?;
        Some(ImplementorEntry {
            key,
            implementors: previous,
        })
    }

    /// Returns the implementor descriptions recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.libraries.get(key).map(Vec::as_slice)
    }

    /// Returns `true` if the table has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.libraries.contains_key(key)
    }

    /// Iterates over the library identifiers in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.libraries.keys().map(String::as_str)
    }

    /// Iterates over `(identifier, descriptions)` pairs in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.libraries
            .iter()
            .map(|(key, implementors)| (key.as_str(), implementors.as_slice()))
    }
}

impl Extend<ImplementorEntry> for ImplementorTable {
    fn extend<I: IntoIterator<Item = ImplementorEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.insert(entry);
        }
    }
}

impl FromIterator<ImplementorEntry> for ImplementorTable {
    fn from_iter<I: IntoIterator<Item = ImplementorEntry>>(entries: I) -> Self {
        let mut table = Self::new();
        table.extend(entries);
        table
    }
}

impl IntoIterator for ImplementorTable {
    type Item = ImplementorEntry;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.libraries.into_iter(),
        }
    }
}

/// Owning iterator over a table's entries, in insertion order.
#[derive(Debug)]
pub struct IntoIter {
    inner: indexmap::map::IntoIter<String, Vec<String>>,
}

impl Iterator for IntoIter {
    type Item = ImplementorEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, implementors) = self.inner.next()?;
        Some(ImplementorEntry { key, implementors })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.inner.len()
    }
}
