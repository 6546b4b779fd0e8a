//! Deferred `up` → `ready` return
//!
//! The counter never waits. It hands out a ticket and whoever drives it
//! (a browser timer, a test) redeems the ticket later. Only the most recent
//! ticket is ever honoured.

/// Identifies one scheduled return; generations never repeat within a counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReturnTicket(u64);

impl ReturnTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Request to call `RepCounter::complete_return` after `delay_ms`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledReturn {
    pub ticket: ReturnTicket,
    pub delay_ms: u32,
}

#[derive(Debug, Default)]
pub(crate) struct PendingReturn {
    generation: u64,
    pending: Option<ReturnTicket>,
}

impl PendingReturn {
    /// Issue a fresh ticket, replacing any outstanding one
    pub fn arm(&mut self) -> ReturnTicket {
        self.generation += 1;
        let ticket = ReturnTicket(self.generation);
        self.pending = Some(ticket);
        ticket
    }

    /// Drop the outstanding ticket, returning it so its timer can be cleared
    pub fn cancel(&mut self) -> Option<ReturnTicket> {
        self.pending.take()
    }

    /// Consume `ticket` if it is the outstanding one
    pub fn redeem(&mut self, ticket: ReturnTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
