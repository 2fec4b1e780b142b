mod identified_keyed;
mod identified_sequence;
mod keyed;
mod leaf;
mod nested;
mod optional;
mod sequence;
mod set;

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt::Debug,
    hash::{BuildHasher, Hash},
};

pub use identified_keyed::IdentifiedKeyedDiffer;
pub use identified_sequence::IdentifiedSequenceDiffer;
pub use keyed::KeyedDiffer;
pub use leaf::{FloatDiffer, LeafDiffer};
pub use nested::NestedDiffer;
pub use optional::OptionalDiffer;
pub use sequence::SequenceDiffer;
pub use set::SetDiffer;

use crate::{Fingerprint, Operation, Reverter};

/// Computes the operations that turn `current` back into `previous`.
///
/// Diffing is total: it never fails, and an empty result means the two
/// values are equal as far as this differ can tell.
pub trait Differ<Value> {
    fn diff(&self, current: &Value, previous: &Value) -> Vec<Operation<Value>>;
}

/// A value that knows which of its parts take part in diffing.
///
/// Records register each tracked field together with the strategy used to
/// diff it:
///
/// ```
/// use reversion::{
///     Fingerprint, Fingerprinter, LeafDiffer, Reverter, Revertible, SequenceDiffer, diff,
///     field,
/// };
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Draft {
///     title: String,
///     revision: u32,
/// }
///
/// impl Fingerprint for Draft {
///     fn write_fingerprint(&self, fingerprinter: &mut Fingerprinter) {
///         self.title.write_fingerprint(fingerprinter);
///         self.revision.write_fingerprint(fingerprinter);
///     }
/// }
///
/// impl Revertible for Draft {
///     fn describe(reverter: &mut Reverter<'_, Self>) {
///         reverter
///             .field(field!(Draft, title), SequenceDiffer)
///             .field(field!(Draft, revision), LeafDiffer);
///     }
/// }
///
/// let old = Draft { title: "Intro".to_owned(), revision: 1 };
/// let mut new = Draft { title: "Introduction".to_owned(), revision: 2 };
///
/// diff(&new, &old).unwrap().revert(&mut new).unwrap();
/// assert_eq!(new, old);
/// ```
pub trait Revertible: Fingerprint + Clone + Debug + Send + Sync + 'static {
    fn describe(reverter: &mut Reverter<'_, Self>);
}

/// The identity witness for identity-aware reconciliation: a stable
/// identifier that survives edits to the rest of the element.
pub trait Identifiable {
    type Id: Eq + Hash + Clone + Debug;

    fn id(&self) -> Self::Id;
}

/// Makes scalar types [`Revertible`] by comparing them whole.
#[macro_export]
macro_rules! revertible_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Revertible for $ty {
                fn describe(reverter: &mut $crate::Reverter<'_, Self>) {
                    reverter.whole($crate::LeafDiffer);
                }
            }
        )*
    };
}

revertible_leaf!(
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
);

impl Revertible for f32 {
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(FloatDiffer); }
}

impl Revertible for f64 {
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(FloatDiffer); }
}

impl Revertible for String {
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(SequenceDiffer); }
}

impl<T> Revertible for Vec<T>
where
    T: PartialEq + Fingerprint + Clone + Debug + Send + Sync + 'static,
{
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(SequenceDiffer); }
}

impl<T: Revertible> Revertible for Option<T> {
    fn describe(reverter: &mut Reverter<'_, Self>) {
        reverter.whole(OptionalDiffer(NestedDiffer));
    }
}

impl<T> Revertible for BTreeSet<T>
where
    T: Ord + Fingerprint + Clone + Debug + Send + Sync + 'static,
{
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(SetDiffer); }
}

impl<T, S> Revertible for HashSet<T, S>
where
    T: Eq + Hash + Fingerprint + Clone + Debug + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(SetDiffer); }
}

impl<K, V> Revertible for BTreeMap<K, V>
where
    K: Ord + Fingerprint + Clone + Debug + Send + Sync + 'static,
    V: PartialEq + Fingerprint + Clone + Debug + Send + Sync + 'static,
{
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(KeyedDiffer); }
}

impl<K, V, S> Revertible for HashMap<K, V, S>
where
    K: Eq + Hash + Fingerprint + Clone + Debug + Send + Sync + 'static,
    V: PartialEq + Fingerprint + Clone + Debug + Send + Sync + 'static,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn describe(reverter: &mut Reverter<'_, Self>) { reverter.whole(KeyedDiffer); }
}
