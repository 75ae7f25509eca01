//! Key-space scanning shared by the listing operations.
//!
//! Every listing walks a key-sorted `BTreeMap` through the same stages:
//! start after the marker, stay inside the prefix, fold keys that contain the
//! delimiter into common prefixes, then cut a page. [`KeyScan`] yields the
//! folded entry stream lazily, jumping over each common prefix with a single
//! range lookup; [`paginate`] cuts it.

use std::collections::BTreeMap;
use std::ops::Bound;

/// One entry of a scan: a key with its value, or a folded common prefix.
#[derive(Debug)]
pub enum ListEntry<'a, V> {
    /// A key that contains no delimiter past the prefix.
    Item {
        /// The key.
        key: &'a str,
        /// The value stored under it.
        value: &'a V,
    },
    /// A group of keys sharing text up to the first delimiter past the prefix.
    CommonPrefix(String),
}

/// Lazy scan of a sorted key space.
///
/// Common prefixes are yielded once, in key order, at the position of the
/// first key they cover. A marker that falls inside a common prefix skips
/// the whole group, since a previous page already reported it.
#[derive(Debug)]
pub struct KeyScan<'a, V> {
    map: &'a BTreeMap<String, V>,
    prefix: &'a str,
    delimiter: Option<&'a str>,
    /// Lower bound of the next lookup; `None` once exhausted.
    cursor: Option<Bound<String>>,
}

impl<'a, V> KeyScan<'a, V> {
    /// Scan `map` for keys starting with `prefix` that sort after `marker`.
    ///
    /// An empty delimiter or marker counts as absent.
    #[must_use]
    pub fn new(
        map: &'a BTreeMap<String, V>,
        prefix: &'a str,
        delimiter: Option<&'a str>,
        marker: Option<&str>,
    ) -> Self {
        let delimiter = delimiter.filter(|d| !d.is_empty());
        let mut cursor = Some(Bound::Included(prefix.to_owned()));

        if let Some(marker) = marker.filter(|m| !m.is_empty()) {
            if marker >= prefix {
                cursor = Some(Bound::Excluded(marker.to_owned()));
            }
            if let Some(cp) = delimiter
                .filter(|_| marker.starts_with(prefix))
                .and_then(|d| common_prefix(marker, prefix, d))
            {
                cursor = prefix_successor(&cp).map(Bound::Included);
            }
        }

        Self {
            map,
            prefix,
            delimiter,
            cursor,
        }
    }
}

impl<'a, V> Iterator for KeyScan<'a, V> {
    type Item = ListEntry<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        let map = self.map;
        let (key, value) = map
            .range::<str, _>((cursor.as_ref().map(String::as_str), Bound::Unbounded))
            .next()?;
        if !key.starts_with(self.prefix) {
            return None;
        }

        if let Some(cp) = self
            .delimiter
            .and_then(|d| common_prefix(key, self.prefix, d))
        {
            self.cursor = prefix_successor(&cp).map(Bound::Included);
            return Some(ListEntry::CommonPrefix(cp));
        }

        self.cursor = Some(Bound::Excluded(key.clone()));
        Some(ListEntry::Item { key, value })
    }
}

/// The common prefix of `key`: everything through the first `delimiter`
/// occurrence after `prefix`. `key` must start with `prefix`.
#[must_use]
pub fn common_prefix(key: &str, prefix: &str, delimiter: &str) -> Option<String> {
    key.get(prefix.len()..)?
        .find(delimiter)
        .map(|pos| key[..prefix.len() + pos + delimiter.len()].to_owned())
}

/// The smallest string sorting after every string that starts with `prefix`.
///
/// `None` when no such string exists (the prefix is all `char::MAX`).
#[must_use]
pub fn prefix_successor(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        let next = match last {
            '\u{D7FF}' => Some('\u{E000}'),
            char::MAX => None,
            c => char::from_u32(u32::from(c) + 1),
        };
        if let Some(next) = next {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

/// One page of a listing.
#[derive(Debug)]
pub struct Page<T> {
    /// Up to `max` entries.
    pub entries: Vec<T>,
    /// Whether entries remain after this page.
    pub is_truncated: bool,
}

/// Take up to `max` entries and report whether any remain.
///
/// A page of zero entries is never truncated.
#[must_use]
pub fn paginate<I: Iterator>(mut entries: I, max: usize) -> Page<I::Item> {
    if max == 0 {
        return Page {
            entries: Vec::new(),
            is_truncated: false,
        };
    }
    let page: Vec<I::Item> = entries.by_ref().take(max).collect();
    let is_truncated = page.len() == max && entries.next().is_some();
    Page {
        entries: page,
        is_truncated,
    }
}
