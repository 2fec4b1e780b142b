use std::ops::RangeInclusive;

/// Sorts `indices` and merges runs of consecutive values into closed ranges.
/// Duplicates are collapsed.
///
/// ## Example
///
/// ```not_rust
/// [7, 1, 2, 3, 5, 6]
/// ```
/// > results in `[1..=3, 5..=7]`
pub fn compact_ranges(mut indices: Vec<usize>) -> Vec<RangeInclusive<usize>> {
    indices.sort_unstable();
    indices.dedup();

    let mut ranges: Vec<RangeInclusive<usize>> = Vec::new();
    for index in indices {
        match ranges.last_mut() {
            Some(last) if *last.end() + 1 == index => *last = *last.start()..=index,
            _ => ranges.push(index..=index),
        }
    }

    ranges
}
