use std::{collections::HashMap, hash::Hash};

/// Builds a lookup from identity to payload. Returns `None` as soon as an
/// identity shows up twice, since positions can no longer be told apart.
pub fn unique_index<Id, Payload>(
    pairs: impl IntoIterator<Item = (Id, Payload)>,
) -> Option<HashMap<Id, Payload>>
where
    Id: Eq + Hash,
{
    let pairs = pairs.into_iter();
    let mut index = HashMap::with_capacity(pairs.size_hint().0);
    for (id, payload) in pairs {
        if index.insert(id, payload).is_some() {
            return None;
        }
    }

    Some(index)
}
