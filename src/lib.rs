//! In-memory seat reservation engine built on two hand-rolled indexed
//! structures.
//!
//! The core of this crate is exactly two data structures:
//!
//! - [`OrderedMap`] — an ordered integer-keyed map implemented as a
//!   red-black tree over an index-addressed arena, giving O(log n) search,
//!   insert, and remove plus ascending in-order iteration.
//! - [`IndexedMinHeap`] — a fixed-capacity array-backed binary min-heap
//!   that additionally supports arbitrary-element removal and in-place
//!   update (linear scan plus O(log n) re-sift).
//!
//! On top of them sits [`TicketDesk`], the reservation engine: the lowest
//! free seat is assigned first, sold-out reservations join a waitlist served
//! by priority then arrival, and cancellations and seat additions promote
//! waitlisted users. With the default `std` feature the [`command`] module
//! parses the textual command vocabulary and processes whole command files;
//! the `seatdesk` binary wraps that end to end.
//!
//! # Example
//!
//! ```
//! use seatdesk::{Event, TicketDesk};
//!
//! let mut desk = TicketDesk::new();
//! desk.initialize(2);
//!
//! assert_eq!(desk.reserve(101, 1), Event::SeatReserved { user: 101, seat: 1 });
//! assert_eq!(desk.reserve(102, 1), Event::SeatReserved { user: 102, seat: 2 });
//! // Sold out: user 103 waits, and inherits the next freed seat.
//! assert_eq!(desk.reserve(103, 5), Event::Waitlisted { user: 103 });
//! assert_eq!(
//!     desk.cancel(1, 101),
//!     [
//!         Event::ReservationCancelled { user: 101 },
//!         Event::SeatReserved { user: 103, seat: 1 },
//!     ]
//! );
//! ```
//!
//! # Features
//!
//! - **`no_std` core** — the engine and both structures only require
//!   `alloc`; the command layer and binary sit behind the default `std`
//!   feature.
//! - **Single-threaded by design** — no internal locking; a structure is
//!   owned by one logical thread of control, and callers needing sharing
//!   must wrap whole structures in their own exclusion.
//! - **`tracing` feature** — opt-in instrumentation of the engine and
//!   command layers; the data-structure cores never log.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod raw;
mod trace;

pub mod desk;
pub mod min_heap;
pub mod ordered_map;
pub mod waitlist;

#[cfg(feature = "std")]
pub mod command;

pub use desk::{Event, SeatId, TicketDesk, UserId, WAITLIST_CAPACITY};
pub use min_heap::{EmptyHeap, IndexedMinHeap};
pub use ordered_map::OrderedMap;
pub use waitlist::WaitlistEntry;

#[cfg(feature = "std")]
pub use command::Command;
