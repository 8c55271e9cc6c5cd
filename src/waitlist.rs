//! Ordering contract for waitlisted users.

use core::cmp::Ordering;

use crate::desk::UserId;

/// A waitlisted user: identity, numeric priority, and arrival stamp.
///
/// The ordering is what the waitlist heap serves by: a *higher* numeric
/// priority sorts first, ties break by earlier arrival, and the user id
/// keeps the order total. The arrival stamp is a logical sequence number
/// issued by the engine, so replaying the same command sequence always
/// yields the same service order.
///
/// Equality compares all three fields; identity lookups ("is user 42
/// waitlisted?") go through the heap's predicate operations instead of
/// `==`, keeping `Ord` and `Eq` consistent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitlistEntry {
    pub user: UserId,
    pub priority: u32,
    pub arrival: u64,
}

impl WaitlistEntry {
    #[must_use]
    pub const fn new(user: UserId, priority: u32, arrival: u64) -> Self {
        Self {
            user,
            priority,
            arrival,
        }
    }
}

impl Ord for WaitlistEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted on priority: the heap is a min-heap, so "smallest" must
        // mean "served first".
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.arrival.cmp(&other.arrival))
            .then_with(|| self.user.cmp(&other.user))
    }
}

impl PartialOrd for WaitlistEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn higher_priority_sorts_first() {
        let urgent = WaitlistEntry::new(1, 9, 5);
        let casual = WaitlistEntry::new(2, 1, 0);
        assert!(urgent < casual);
    }

    #[test]
    fn equal_priority_is_fifo() {
        let early = WaitlistEntry::new(1, 4, 10);
        let late = WaitlistEntry::new(2, 4, 11);
        assert!(early < late);
    }
}
