//! Request sequencing for a single logical request slot.
//!
//! Responses to concurrent requests arrive in arrival order, not request
//! order. A [`SequenceFence`] tags each request with a monotonically
//! increasing [`Ticket`]; a response may be applied only if its ticket is
//! newer than every ticket applied before it. A slow response to an older
//! request can then never overwrite the result of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a request in its slot's issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SequenceFence {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SequenceFence {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Tags a new request.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claims the right to apply the response for `ticket`.
    ///
    /// Returns `false` when a newer ticket has already been applied or the
    /// fence was invalidated after `ticket` was issued.
    pub fn try_apply(&self, ticket: Ticket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }

    /// Rejects every ticket issued so far.
    ///
    /// Used when results are reset, so a request still in flight cannot
    /// repopulate them.
    pub fn invalidate(&self) {
        let issued = self.issued.load(Ordering::SeqCst);
        self.applied.fetch_max(issued, Ordering::SeqCst);
    }
}
