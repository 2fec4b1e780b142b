use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    fmt::{self, Display},
    hash::{BuildHasher, Hash, Hasher},
    sync::Arc,
};

use fxhash::FxHasher64;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural hash of a value, used to check that a `Reversion` is only
/// ever applied to the exact value it was computed from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralFingerprint(u64);

impl StructuralFingerprint {
    #[must_use]
    pub fn as_u64(self) -> u64 { self.0 }
}

impl Display for StructuralFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:016x}", self.0) }
}

/// Accumulates the structure of a value. Values feed their parts into it in a
/// fixed order, so two structurally equal values produce the same output.
#[derive(Default)]
pub struct Fingerprinter {
    hasher: FxHasher64,
}

impl fmt::Debug for Fingerprinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprinter").finish_non_exhaustive()
    }
}

impl Fingerprinter {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Feeds any `Hash` value into the fingerprint.
    pub fn write<H: Hash + ?Sized>(&mut self, value: &H) { value.hash(&mut self.hasher); }

    pub fn write_u64(&mut self, value: u64) { self.hasher.write_u64(value); }

    pub fn write_usize(&mut self, value: usize) { self.hasher.write_usize(value); }

    #[must_use]
    pub fn finish(self) -> StructuralFingerprint { StructuralFingerprint(self.hasher.finish()) }

    /// Feeds a collection whose iteration order carries no meaning. Every item
    /// is fingerprinted on its own and the results are combined with a
    /// commutative sum.
    pub fn write_unordered<T, I>(&mut self, items: I)
    where
        T: Fingerprint,
        I: IntoIterator<Item = T>,
    {
        let mut count = 0_usize;
        let mut sum = 0_u64;
        for item in items {
            count += 1;
            sum = sum.wrapping_add(item.fingerprint().as_u64());
        }
        self.write_usize(count);
        self.write_u64(sum);
    }
}

/// The fingerprint witness: a structural hash over everything that takes
/// part in diffing.
///
/// Record types implement it by feeding their fields in declaration order;
/// types that already implement `Hash` can use [`fingerprint_via_hash!`].
pub trait Fingerprint {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter);

    fn fingerprint(&self) -> StructuralFingerprint {
        let mut fingerprinter = Fingerprinter::new();
        self.write_fingerprint(&mut fingerprinter);
        fingerprinter.finish()
    }
}

/// Implements [`Fingerprint`] for types that implement `Hash`.
#[macro_export]
macro_rules! fingerprint_via_hash {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Fingerprint for $ty {
                fn write_fingerprint(&self, fingerprinter: &mut $crate::Fingerprinter) {
                    fingerprinter.write(self);
                }
            }
        )*
    };
}

fingerprint_via_hash!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    str,
);

impl Fingerprint for f32 {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write(&self.to_bits());
    }
}

impl Fingerprint for f64 {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write(&self.to_bits());
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for &T {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        (**self).write_fingerprint(fingerprinter);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for Box<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        (**self).write_fingerprint(fingerprinter);
    }
}

impl<T: Fingerprint + ?Sized> Fingerprint for Arc<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        (**self).write_fingerprint(fingerprinter);
    }
}

impl<T: Fingerprint> Fingerprint for Option<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        match self {
            None => fingerprinter.write_u64(0),
            Some(value) => {
                fingerprinter.write_u64(1);
                value.write_fingerprint(fingerprinter);
            }
        }
    }
}

impl<T: Fingerprint> Fingerprint for [T] {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_usize(self.len());
        for item in self {
            item.write_fingerprint(fingerprinter);
        }
    }
}

impl<T: Fingerprint, const N: usize> Fingerprint for [T; N] {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.as_slice().write_fingerprint(fingerprinter);
    }
}

impl<T: Fingerprint> Fingerprint for Vec<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        self.as_slice().write_fingerprint(fingerprinter);
    }
}

impl<T: Fingerprint> Fingerprint for VecDeque<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_usize(self.len());
        for item in self {
            item.write_fingerprint(fingerprinter);
        }
    }
}

impl<T: Fingerprint> Fingerprint for BTreeSet<T> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_usize(self.len());
        for item in self {
            item.write_fingerprint(fingerprinter);
        }
    }
}

impl<K: Fingerprint, V: Fingerprint> Fingerprint for BTreeMap<K, V> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_usize(self.len());
        for (key, value) in self {
            key.write_fingerprint(fingerprinter);
            value.write_fingerprint(fingerprinter);
        }
    }
}

impl<T: Fingerprint, S: BuildHasher> Fingerprint for HashSet<T, S> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_unordered(self.iter());
    }
}

impl<K: Fingerprint, V: Fingerprint, S: BuildHasher> Fingerprint for HashMap<K, V, S> {
    fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
        fingerprinter.write_unordered(self.iter());
    }
}

macro_rules! fingerprint_tuple {
    ($($name:ident)+) => {
        impl<$($name: Fingerprint),+> Fingerprint for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
                let ($($name,)+) = self;
                $($name.write_fingerprint(fingerprinter);)+
            }
        }
    };
}

fingerprint_tuple!(A);
fingerprint_tuple!(A B);
fingerprint_tuple!(A B C);
fingerprint_tuple!(A B C D);
fingerprint_tuple!(A B C D E);
fingerprint_tuple!(A B C D E F);

#[cfg(test)]
mod tests {
    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;

    #[test]
    fn test_equal_values_share_a_fingerprint() {
        assert_eq!(
            vec!["a".to_owned(), "b".to_owned()].fingerprint(),
            vec!["a".to_owned(), "b".to_owned()].fingerprint()
        );
        assert_eq!(Some(3_u8).fingerprint(), Some(3_u8).fingerprint());
    }

    #[test]
    fn test_order_matters_for_sequences() {
        assert_ne!(vec![1, 2].fingerprint(), vec![2, 1].fingerprint());
    }

    #[test]
    fn test_nesting_is_not_ambiguous() {
        let flat: Vec<Vec<u8>> = vec![vec![1, 2], vec![]];
        let shifted: Vec<Vec<u8>> = vec![vec![1], vec![2]];
        assert_ne!(flat.fingerprint(), shifted.fingerprint());
        assert_ne!(None::<u8>.fingerprint(), Some(0_u8).fingerprint());
    }

    #[test]
    fn test_hashed_containers_ignore_iteration_order() {
        let left: HashSet<u32> = (0..64).collect();
        let right: HashSet<u32> = (0..64).rev().collect();
        assert_eq!(left.fingerprint(), right.fingerprint());

        let left: HashMap<u32, String> = (0..16).map(|i| (i, i.to_string())).collect();
        let right: HashMap<u32, String> = (0..16).rev().map(|i| (i, i.to_string())).collect();
        assert_eq!(left.fingerprint(), right.fingerprint());
    }

    #[test]
    fn test_hashed_map_values_matter() {
        let left: HashMap<u32, u32> = [(1, 1), (2, 2)].into_iter().collect();
        let right: HashMap<u32, u32> = [(1, 2), (2, 1)].into_iter().collect();
        assert_ne!(left.fingerprint(), right.fingerprint());
    }

    #[test]
    fn test_floats_fingerprint_by_bits() {
        assert_eq!(1.5_f64.fingerprint(), 1.5_f64.fingerprint());
        assert_ne!(0.0_f64.fingerprint(), (-0.0_f64).fingerprint());
    }
}
