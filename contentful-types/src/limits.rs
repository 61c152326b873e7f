use serde::{Deserialize, Serialize};

/// Nesting depth accepted when no explicit limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Resource bounds applied while decoding untrusted payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeLimits {
    /// Deepest nesting level a recursive payload may reach. The top-level
    /// node sits at depth 1.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl DecodeLimits {
    /// Creates limits with an explicit maximum depth.
    #[must_use]
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
