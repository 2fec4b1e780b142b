use crate::ErrorPolicy;

pub const DEFAULT_DEBOUNCE_MS: u64 = 0;
pub const DEFAULT_ERROR_POLICY: ErrorPolicy = ErrorPolicy::Propagate;
