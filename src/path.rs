use std::{
    borrow::Cow,
    fmt::{self, Debug, Display},
    sync::Arc,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MapContainer, RevertError};

type Getter<Root, Value> = dyn for<'a> Fn(&'a Root) -> Option<&'a Value> + Send + Sync;
type Mutator<Root, Value> = dyn for<'a> Fn(&'a mut Root) -> Option<&'a mut Value> + Send + Sync;

/// One printable step of a `Path`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(Cow<'static, str>),
    Index(usize),
    /// Map key, rendered with its `Debug` representation
    Key(String),
    /// Unwraps an `Option`
    Some,
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => write!(f, ".{name}"),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Key(key) => write!(f, "[{key}]"),
            Segment::Some => write!(f, "?"),
        }
    }
}

/// Renders a list of segments as `$.field[0]?`.
pub(crate) fn render_segments(segments: &[Segment]) -> String {
    let mut rendered = String::from("$");
    for segment in segments {
        rendered.push_str(&segment.to_string());
    }
    rendered
}

/// A composable accessor that reads and writes a `Value` somewhere inside a
/// `Root`.
///
/// Every step may fail to resolve (an index past the end, a missing map key,
/// a `None`), so both directions return an `Option`.
///
/// ```
/// use reversion::{Path, field};
///
/// #[derive(Debug, Clone)]
/// struct Shelf {
///     books: Vec<String>,
/// }
///
/// let second_book = field!(Shelf, books).then(&Path::index(1));
/// let mut shelf = Shelf {
///     books: vec!["Emma".to_owned(), "Persuasion".to_owned()],
/// };
///
/// assert_eq!(second_book.get(&shelf).map(String::as_str), Some("Persuasion"));
/// second_book.set(&mut shelf, "Sanditon".to_owned()).unwrap();
/// assert_eq!(shelf.books[1], "Sanditon");
/// assert_eq!(second_book.to_string(), "$.books[1]");
/// ```
pub struct Path<Root, Value> {
    segments: Vec<Segment>,
    get: Arc<Getter<Root, Value>>,
    get_mut: Arc<Mutator<Root, Value>>,
}

// Pins the higher-ranked signature that closure inference would not pick on
// its own when the closure is boxed straight away.
fn getter<Root, Value, F>(f: F) -> F
where
    F: for<'a> Fn(&'a Root) -> Option<&'a Value>,
{
    f
}

fn mutator<Root, Value, F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut Root) -> Option<&'a mut Value>,
{
    f
}

impl<Root: 'static> Path<Root, Root> {
    /// The empty path, resolving to the root itself.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            segments: Vec::new(),
            get: Arc::new(getter(|root: &Root| Some(root))),
            get_mut: Arc::new(mutator(|root: &mut Root| Some(root))),
        }
    }
}

impl<Root: 'static, Value: 'static> Path<Root, Value> {
    /// A path to a named field. Prefer the [`field!`](crate::field) macro.
    pub fn field<G, M>(name: &'static str, get: G, get_mut: M) -> Self
    where
        G: Fn(&Root) -> &Value + Send + Sync + 'static,
        M: Fn(&mut Root) -> &mut Value + Send + Sync + 'static,
    {
        Self {
            segments: vec![Segment::Field(Cow::Borrowed(name))],
            get: Arc::new(getter(move |root: &Root| Some(get(root)))),
            get_mut: Arc::new(mutator(move |root: &mut Root| Some(get_mut(root)))),
        }
    }

    /// Chains `next` behind this path.
    #[must_use]
    pub fn then<Next: 'static>(&self, next: &Path<Value, Next>) -> Path<Root, Next> {
        let (outer_get, inner_get) = (Arc::clone(&self.get), Arc::clone(&next.get));
        let (outer_mut, inner_mut) = (Arc::clone(&self.get_mut), Arc::clone(&next.get_mut));

        Path {
            segments: self
                .segments
                .iter()
                .chain(&next.segments)
                .cloned()
                .collect(),
            get: Arc::new(getter(move |root: &Root| {
                outer_get(root).and_then(|value| inner_get(value))
            })),
            get_mut: Arc::new(mutator(move |root: &mut Root| {
                outer_mut(root).and_then(|value| inner_mut(value))
            })),
        }
    }

    pub fn get<'a>(&self, root: &'a Root) -> Option<&'a Value> { (self.get)(root) }

    pub fn get_mut<'a>(&self, root: &'a mut Root) -> Option<&'a mut Value> { (self.get_mut)(root) }

    /// Writes `value` through the path.
    ///
    /// # Errors
    ///
    /// Returns `RevertError::UnresolvedPath` if the path does not lead to a
    /// value on `root`.
    pub fn set(&self, root: &mut Root, value: Value) -> Result<(), RevertError> {
        let slot = self.get_mut(root).ok_or_else(|| RevertError::UnresolvedPath {
            path: self.to_string(),
        })?;
        *slot = value;
        Ok(())
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] { &self.segments }
}

impl<T: 'static> Path<Vec<T>, T> {
    /// The element at `index`.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self {
            segments: vec![Segment::Index(index)],
            get: Arc::new(getter(move |items: &Vec<T>| items.get(index))),
            get_mut: Arc::new(mutator(move |items: &mut Vec<T>| items.get_mut(index))),
        }
    }
}

impl<M: MapContainer> Path<M, M::Value> {
    /// The value stored under `key`.
    #[must_use]
    pub fn key(key: M::Key) -> Self {
        let segment = Segment::Key(format!("{key:?}"));
        let mut_key = key.clone();

        Self {
            segments: vec![segment],
            get: Arc::new(getter(move |map: &M| map.value(&key))),
            get_mut: Arc::new(mutator(move |map: &mut M| map.value_mut(&mut_key))),
        }
    }
}

impl<T: 'static> Path<Option<T>, T> {
    /// The content of a `Some`.
    #[must_use]
    pub fn some() -> Self {
        Self {
            segments: vec![Segment::Some],
            get: Arc::new(getter(|value: &Option<T>| value.as_ref())),
            get_mut: Arc::new(mutator(|value: &mut Option<T>| value.as_mut())),
        }
    }
}

impl<Root, Value> Clone for Path<Root, Value> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            get: Arc::clone(&self.get),
            get_mut: Arc::clone(&self.get_mut),
        }
    }
}

impl<Root, Value> Display for Path<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_segments(&self.segments))
    }
}

impl<Root, Value> Debug for Path<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path")
            .field(&render_segments(&self.segments))
            .finish()
    }
}

/// Builds a [`Path`] to a named field of a struct.
///
/// ```
/// use reversion::field;
///
/// #[derive(Debug, Clone)]
/// struct Note {
///     title: String,
/// }
///
/// let title = field!(Note, title);
/// let note = Note { title: "Groceries".to_owned() };
/// assert_eq!(title.get(&note).map(String::as_str), Some("Groceries"));
/// ```
#[macro_export]
macro_rules! field {
    ($root:ty, $name:ident) => {
        $crate::Path::<$root, _>::field(
            stringify!($name),
            |root: &$root| &root.$name,
            |root: &mut $root| &mut root.$name,
        )
    };
}
