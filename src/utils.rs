pub mod common_prefix_len;
pub mod common_suffix_len;
pub mod compact_ranges;
pub mod myers_diff;
pub mod unique_index;
