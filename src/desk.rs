//! The reservation engine: one ordered map and two heaps behind a command
//! vocabulary.

use alloc::vec::Vec;
use core::fmt;

use crate::min_heap::IndexedMinHeap;
use crate::ordered_map::OrderedMap;
use crate::trace::debug_log;
use crate::waitlist::WaitlistEntry;

/// Seat number, starting at 1.
pub type SeatId = u32;

/// User identifier.
pub type UserId = u32;

/// Capacity of the waitlist and of the available-seat pool.
pub const WAITLIST_CAPACITY: usize = 10_000;

/// One response line from the engine.
///
/// Operations return events rather than strings; `Display` renders the
/// canonical response text for each.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    /// Seats entered the available pool at startup.
    SeatsInitialized { count: u32 },
    /// Additional seats entered the available pool.
    SeatsAdded { count: u32 },
    /// A seat-count argument was out of range.
    InvalidSeatCount,
    /// Snapshot of pool and waitlist sizes.
    Availability { seats: usize, waitlisted: usize },
    /// A seat was bound to a user.
    SeatReserved { user: UserId, seat: SeatId },
    /// No seat was free; the user joined the waitlist.
    Waitlisted { user: UserId },
    /// The waitlist was full; the user was turned away.
    WaitlistFull { user: UserId },
    /// A reservation was cancelled by its holder.
    ReservationCancelled { user: UserId },
    /// The user holds no reservation at all.
    NoReservationToCancel { user: UserId },
    /// The user holds a reservation, but not for the named seat.
    WrongSeatToCancel { user: UserId, seat: SeatId },
    /// The user left the waitlist.
    RemovedFromWaitlist { user: UserId },
    /// The user was not waitlisted.
    NotInWaitlist { user: UserId },
    /// A waitlisted user's priority changed.
    PriorityUpdated { user: UserId, priority: u32 },
    /// The priority-change target was not waitlisted.
    PriorityNotUpdated { user: UserId },
    /// One reservation line of a listing, ascending by seat.
    Reservation { seat: SeatId, user: UserId },
    /// Every user in the inclusive range was released.
    ReservationsReleased { low: UserId, high: UserId },
    /// The release range was inverted.
    InvalidUserRange,
    /// The session ended.
    Terminated,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SeatsInitialized { count } => {
                write!(f, "{count} Seats are made available for reservation")
            }
            Self::SeatsAdded { count } => {
                write!(f, "Additional {count} Seats are made available for reservation")
            }
            Self::InvalidSeatCount => {
                write!(f, "Invalid input. Please provide a valid number of seats.")
            }
            Self::Availability { seats, waitlisted } => {
                write!(f, "Total Seats Available : {seats}, Waitlist : {waitlisted}")
            }
            Self::SeatReserved { user, seat } => write!(f, "User {user} reserved seat {seat}"),
            Self::Waitlisted { user } => write!(f, "User {user} is added to the waiting list"),
            Self::WaitlistFull { user } => {
                write!(f, "User {user} could not be added to the waiting list")
            }
            Self::ReservationCancelled { user } => {
                write!(f, "User {user} canceled their reservation")
            }
            Self::NoReservationToCancel { user } => {
                write!(f, "User {user} has no reservation to cancel")
            }
            Self::WrongSeatToCancel { user, seat } => {
                write!(f, "User {user} has no reservation for seat {seat} to cancel")
            }
            Self::RemovedFromWaitlist { user } => {
                write!(f, "User {user} is removed from the waiting list")
            }
            Self::NotInWaitlist { user } => write!(f, "User {user} is not in waitlist"),
            Self::PriorityUpdated { user, priority } => {
                write!(f, "User {user} priority has been updated to {priority}")
            }
            Self::PriorityNotUpdated { user } => write!(f, "User {user} priority is not updated"),
            Self::Reservation { seat, user } => write!(f, "[{seat}, {user}]"),
            Self::ReservationsReleased { low, high } => {
                write!(f, "Reservations of the Users in the range [{low}, {high}] are released")
            }
            Self::InvalidUserRange => {
                write!(f, "Invalid input. Please provide a valid range of users.")
            }
            Self::Terminated => write!(f, "Program Terminated!!"),
        }
    }
}

/// The reservation engine.
///
/// Composes one [`OrderedMap`] binding reserved seats to their holders and
/// two [`IndexedMinHeap`]s: the pool of free seat numbers (lowest seat
/// assigned first) and the waitlist (highest priority, then earliest
/// arrival, served first). Single-threaded and synchronous; every operation
/// runs to completion with no I/O.
pub struct TicketDesk {
    /// seat → user, enumerated ascending by seat.
    reservations: OrderedMap,
    available: IndexedMinHeap<SeatId>,
    waitlist: IndexedMinHeap<WaitlistEntry>,
    /// Highest seat number ever created; new seats continue from here.
    total_seats: u32,
    /// Logical clock stamping waitlist arrivals.
    arrivals: u64,
}

impl Default for TicketDesk {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketDesk {
    /// Creates an engine with no seats and empty pools.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reservations: OrderedMap::new(),
            available: IndexedMinHeap::with_capacity(WAITLIST_CAPACITY),
            waitlist: IndexedMinHeap::with_capacity(WAITLIST_CAPACITY),
            total_seats: 0,
            arrivals: 0,
        }
    }

    /// Makes `count` fresh seats available for reservation.
    pub fn initialize(&mut self, count: u32) -> Event {
        if count as usize > self.available.capacity() {
            return Event::InvalidSeatCount;
        }
        let added = self.create_seats(count);
        debug_log!("initialized {added} seats");
        Event::SeatsInitialized { count: added }
    }

    /// Reports the free-seat and waitlist counts.
    #[must_use]
    pub fn available(&self) -> Event {
        Event::Availability {
            seats: self.available.len(),
            waitlisted: self.waitlist.len(),
        }
    }

    /// Assigns the lowest free seat to `user`, or waitlists them.
    pub fn reserve(&mut self, user: UserId, priority: u32) -> Event {
        if let Ok(seat) = self.available.extract_min() {
            self.reservations.insert(seat, user);
            debug_log!("user {user} took seat {seat}");
            return Event::SeatReserved { user, seat };
        }
        let entry = WaitlistEntry::new(user, priority, self.next_arrival());
        if self.waitlist.insert(entry) {
            Event::Waitlisted { user }
        } else {
            Event::WaitlistFull { user }
        }
    }

    /// Cancels `user`'s reservation of `seat`.
    ///
    /// The freed seat goes to the head of the waitlist when one exists,
    /// otherwise back into the available pool.
    pub fn cancel(&mut self, seat: SeatId, user: UserId) -> Vec<Event> {
        match self.reservations.get(seat) {
            Some(holder) if holder == user => {}
            _ => {
                // Distinguish "no reservation at all" from "wrong seat".
                let holds_another = self.reservations.iter().any(|(_, holder)| holder == user);
                let event = if holds_another {
                    Event::WrongSeatToCancel { user, seat }
                } else {
                    Event::NoReservationToCancel { user }
                };
                return alloc::vec![event];
            }
        }

        self.reservations.remove(seat);
        let mut events = alloc::vec![Event::ReservationCancelled { user }];

        if let Ok(next) = self.waitlist.extract_min() {
            self.reservations.insert(seat, next.user);
            debug_log!("seat {seat} promoted to user {}", next.user);
            events.push(Event::SeatReserved {
                user: next.user,
                seat,
            });
        } else {
            self.available.insert(seat);
        }
        events
    }

    /// Removes `user` from the waitlist, if present.
    pub fn exit_waitlist(&mut self, user: UserId) -> Event {
        if self.waitlist.remove_element_by(|entry| entry.user == user).is_some() {
            Event::RemovedFromWaitlist { user }
        } else {
            Event::NotInWaitlist { user }
        }
    }

    /// Changes a waitlisted user's priority in place, keeping their
    /// original arrival stamp.
    pub fn update_priority(&mut self, user: UserId, priority: u32) -> Event {
        match self.waitlist.element_and_index_by(|entry| entry.user == user) {
            Some((index, entry)) => {
                let updated = WaitlistEntry::new(user, priority, entry.arrival);
                self.waitlist.update_element(index, updated);
                Event::PriorityUpdated { user, priority }
            }
            None => Event::PriorityNotUpdated { user },
        }
    }

    /// Adds `count` new seat numbers, then serves the waitlist while both
    /// seats and waiters remain.
    pub fn add_seats(&mut self, count: u32) -> Vec<Event> {
        if count as usize > self.available.capacity() {
            return alloc::vec![Event::InvalidSeatCount];
        }
        let added = self.create_seats(count);
        let mut events = alloc::vec![Event::SeatsAdded { count: added }];
        self.promote_waitlist(&mut events);
        events
    }

    /// Lists current reservations ascending by seat.
    #[must_use]
    pub fn print_reservations(&self) -> Vec<Event> {
        self.reservations
            .iter()
            .map(|(seat, user)| Event::Reservation { seat, user })
            .collect()
    }

    /// Releases every reservation and waitlist entry belonging to users in
    /// `low..=high`, then serves the waitlist with the freed seats.
    pub fn release_seats(&mut self, low: UserId, high: UserId) -> Vec<Event> {
        if low > high {
            return alloc::vec![Event::InvalidUserRange];
        }

        let released: Vec<SeatId> = self
            .reservations
            .iter()
            .filter(|&(_, user)| low <= user && user <= high)
            .map(|(seat, _)| seat)
            .collect();
        for seat in released {
            self.reservations.remove(seat);
            self.available.insert(seat);
        }

        while self
            .waitlist
            .remove_element_by(|entry| low <= entry.user && entry.user <= high)
            .is_some()
        {}

        let mut events = alloc::vec![Event::ReservationsReleased { low, high }];
        self.promote_waitlist(&mut events);
        events
    }

    /// Terminal response.
    #[must_use]
    pub fn quit(&self) -> Event {
        Event::Terminated
    }

    /// Serves waitlisted users while seats and waiters both remain.
    fn promote_waitlist(&mut self, events: &mut Vec<Event>) {
        while !self.waitlist.is_empty() && !self.available.is_empty() {
            let seat = self.available.extract_min().expect("pool checked non-empty");
            let entry = self.waitlist.extract_min().expect("waitlist checked non-empty");
            self.reservations.insert(seat, entry.user);
            debug_log!("seat {seat} promoted to user {}", entry.user);
            events.push(Event::SeatReserved {
                user: entry.user,
                seat,
            });
        }
    }

    /// Numbers and inserts new seats, stopping at pool capacity. Returns the
    /// count actually created.
    fn create_seats(&mut self, count: u32) -> u32 {
        let mut added = 0;
        for seat in self.total_seats + 1..=self.total_seats + count {
            if !self.available.insert(seat) {
                break;
            }
            added += 1;
        }
        self.total_seats += added;
        added
    }

    fn next_arrival(&mut self) -> u64 {
        self.arrivals += 1;
        self.arrivals
    }
}
