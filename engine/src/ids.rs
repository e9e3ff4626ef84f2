//! Identifier source for locally created products.
//!
//! The remote catalog assigns small positive IDs. Local products get
//! negative IDs derived from the creation time, so the two spaces never
//! overlap no matter how large the remote catalog grows.

use crate::{ProductId, Timestamp};

/// Hands out strictly decreasing negative identifiers.
///
/// Each ID is `-now` in milliseconds unless that would not be below the last
/// issued one, in which case it is one below it. Two products created in the
/// same millisecond still get distinct IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdSource {
    /// Lowest ID issued or observed so far (0 before the first)
    last: ProductId,
}

impl LocalIdSource {
    /// Create a source that has not issued anything yet.
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Create a source that will never reissue any of `existing`.
    pub fn seeded(existing: impl IntoIterator<Item = ProductId>) -> Self {
        let mut source = Self::new();
        for id in existing {
            source.observe(id);
        }
        source
    }

    /// Record an ID minted elsewhere (for example, loaded from storage).
    pub fn observe(&mut self, id: ProductId) {
        self.last = self.last.min(id);
    }

    /// Lowest ID issued or observed so far.
    pub fn last(&self) -> ProductId {
        self.last
    }

    /// Issue the next local ID for a product created at `now`.
    pub fn next(&mut self, now: Timestamp) -> ProductId {
        let from_clock = -(now.clamp(1, i64::MAX as u64) as i64);
        let id = from_clock.min(self.last.saturating_sub(1));
        self.last = id;
        id
    }
}
