use contentful_types::{DecodeLimits, Error, Result};

/// Per-call decode state threaded through recursive decoders.
///
/// Contexts are `Copy`; each nested call gets its own value from
/// [`DecodeContext::descend`], so no state is shared between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    limits: DecodeLimits,
    depth: usize,
}

impl DecodeContext {
    /// Creates a root context. The first `descend` moves to depth 1.
    #[must_use]
    pub const fn new(limits: DecodeLimits) -> Self {
        Self { limits, depth: 0 }
    }

    /// Returns a context one level deeper, or `RecursionLimitExceeded` when
    /// that level is past `limits.max_depth`.
    pub fn descend(self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.limits.max_depth {
            return Err(Error::RecursionLimitExceeded {
                max_depth: self.limits.max_depth,
            });
        }
        Ok(Self { depth, ..self })
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(DecodeLimits::default())
    }
}
