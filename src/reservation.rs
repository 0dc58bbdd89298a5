//! Per-book reservation queue.
//!
//! Reservations are served earliest request first. Two requests stamped with
//! the same instant are served in the order they were made, using the
//! registry-wide sequence number handed out by the library.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A member waiting for a copy of a book.
///
/// Field order matters: the derived ordering compares `requested_at`, then
/// `seq`, then `member_id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Reservation {
    /// When the reservation was made
    pub requested_at: DateTime<Utc>,

    /// Tie-break for identical timestamps, strictly increasing per library
    pub seq: u64,

    /// The waiting member
    pub member_id: String,
}

/// Min-heap of reservations keyed by `(requested_at, seq)`.
#[derive(Debug, Clone, Default)]
pub struct ReservationQueue {
    heap: BinaryHeap<Reverse<Reservation>>,
}

impl ReservationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a reservation and return its 1-based position in the queue.
    pub fn push(&mut self, reservation: Reservation) -> usize {
        let position = self.heap.iter().filter(|Reverse(r)| *r <= reservation).count() + 1;
        self.heap.push(Reverse(reservation));
        position
    }

    /// Remove and return the earliest reservation.
    pub fn pop(&mut self) -> Option<Reservation> {
        self.heap.pop().map(|Reverse(r)| r)
    }

    /// The reservation that would be served next.
    pub fn peek(&self) -> Option<&Reservation> {
        self.heap.peek().map(|Reverse(r)| r)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// All waiting reservations, earliest first.
    pub fn ordered(&self) -> Vec<&Reservation> {
        let mut waiting: Vec<&Reservation> = self.heap.iter().map(|Reverse(r)| r).collect();
        waiting.sort();
        waiting
    }
}

impl Serialize for ReservationQueue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ordered())
    }
}
