//! Capabilities the differs need from the containers they work on, implemented
//! for the standard collections.

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt::Debug,
    hash::{BuildHasher, Hash},
    ops::RangeInclusive,
};

/// Ordered, index-addressable containers: vectors, deques and text.
pub trait SequenceContainer: Clone + Debug + Send + Sync + 'static {
    type Element: PartialEq + Clone + Debug + Send + Sync + 'static;

    fn elements(&self) -> Cow<'_, [Self::Element]>;

    fn element_count(&self) -> usize;

    /// Removes the closed `range` of element positions.
    fn remove_range(&mut self, range: RangeInclusive<usize>);

    /// Inserts `element` so that it ends up at position `index`.
    fn insert_at(&mut self, index: usize, element: Self::Element);
}

impl<T> SequenceContainer for Vec<T>
where
    T: PartialEq + Clone + Debug + Send + Sync + 'static,
{
    type Element = T;

    fn elements(&self) -> Cow<'_, [T]> { Cow::Borrowed(self.as_slice()) }

    fn element_count(&self) -> usize { self.len() }

    fn remove_range(&mut self, range: RangeInclusive<usize>) { self.drain(range); }

    fn insert_at(&mut self, index: usize, element: T) { self.insert(index, element); }
}

impl<T> SequenceContainer for VecDeque<T>
where
    T: PartialEq + Clone + Debug + Send + Sync + 'static,
{
    type Element = T;

    fn elements(&self) -> Cow<'_, [T]> { Cow::Owned(self.iter().cloned().collect()) }

    fn element_count(&self) -> usize { self.len() }

    fn remove_range(&mut self, range: RangeInclusive<usize>) { self.drain(range); }

    fn insert_at(&mut self, index: usize, element: T) { self.insert(index, element); }
}

/// Text is diffed character by character; all positions are character
/// indices, so multi-byte UTF-8 content is safe.
impl SequenceContainer for String {
    type Element = char;

    fn elements(&self) -> Cow<'_, [char]> { Cow::Owned(self.chars().collect()) }

    fn element_count(&self) -> usize { self.chars().count() }

    fn remove_range(&mut self, range: RangeInclusive<usize>) {
        let start = byte_offset(self, *range.start());
        let end = byte_offset(self, *range.end() + 1);
        self.replace_range(start..end, "");
    }

    fn insert_at(&mut self, index: usize, element: char) {
        let offset = byte_offset(self, index);
        self.insert(offset, element);
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Unordered containers of unique elements.
pub trait SetContainer: Clone + Debug + Send + Sync + 'static {
    type Element: Clone + Debug + Send + Sync + 'static;

    fn members(&self) -> impl Iterator<Item = &Self::Element>;

    fn has(&self, element: &Self::Element) -> bool;

    /// Returns whether the element was newly added.
    fn add(&mut self, element: Self::Element) -> bool;

    /// Returns whether the element was present.
    fn discard(&mut self, element: &Self::Element) -> bool;
}

impl<T, S> SetContainer for HashSet<T, S>
where
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    type Element = T;

    fn members(&self) -> impl Iterator<Item = &T> { self.iter() }

    fn has(&self, element: &T) -> bool { self.contains(element) }

    fn add(&mut self, element: T) -> bool { self.insert(element) }

    fn discard(&mut self, element: &T) -> bool { self.remove(element) }
}

impl<T> SetContainer for BTreeSet<T>
where
    T: Ord + Clone + Debug + Send + Sync + 'static,
{
    type Element = T;

    fn members(&self) -> impl Iterator<Item = &T> { self.iter() }

    fn has(&self, element: &T) -> bool { self.contains(element) }

    fn add(&mut self, element: T) -> bool { self.insert(element) }

    fn discard(&mut self, element: &T) -> bool { self.remove(element) }
}

/// Associative key to value containers.
pub trait MapContainer: Clone + Debug + Send + Sync + 'static {
    type Key: Eq + Clone + Debug + Send + Sync + 'static;
    type Value: Clone + Debug + Send + Sync + 'static;

    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    fn value(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn value_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    fn has_key(&self, key: &Self::Key) -> bool { self.value(key).is_some() }

    /// Inserts or replaces, returning the replaced value.
    fn upsert(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn delete(&mut self, key: &Self::Key) -> Option<Self::Value>;
}

impl<K, V, S> MapContainer for HashMap<K, V, S>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> { self.iter() }

    fn value(&self, key: &K) -> Option<&V> { self.get(key) }

    fn value_mut(&mut self, key: &K) -> Option<&mut V> { self.get_mut(key) }

    fn upsert(&mut self, key: K, value: V) -> Option<V> { self.insert(key, value) }

    fn delete(&mut self, key: &K) -> Option<V> { self.remove(key) }
}

impl<K, V> MapContainer for BTreeMap<K, V>
where
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn entries(&self) -> impl Iterator<Item = (&K, &V)> { self.iter() }

    fn value(&self, key: &K) -> Option<&V> { self.get(key) }

    fn value_mut(&mut self, key: &K) -> Option<&mut V> { self.get_mut(key) }

    fn upsert(&mut self, key: K, value: V) -> Option<V> { self.insert(key, value) }

    fn delete(&mut self, key: &K) -> Option<V> { self.remove(key) }
}
