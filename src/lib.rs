//! libdesk: an in-memory library circulation desk.
//!
//! Tracks books, members, loans, reservations and overdue fines. All state
//! lives in one [`Library`] that the caller owns and drives directly.
//!
//! # Example
//!
//! ```
//! use libdesk::{Library, Money};
//!
//! let mut library = Library::new();
//! library.add_book("B005", "The Hobbit", "J.R.R. Tolkien", 1).unwrap();
//! library.register_member("M001", "Alice Johnson", "alice@example.com").unwrap();
//! library.register_member("M002", "Bob Smith", "bob@example.com").unwrap();
//!
//! // Alice takes the only copy, Bob queues for it
//! library.borrow_book("M001", "B005").unwrap();
//! library.reserve_book("M002", "B005").unwrap();
//!
//! // Returning on time costs nothing and passes the copy to Bob
//! let checkin = library.return_book("M001", "B005").unwrap();
//! assert_eq!(checkin.fine, Money::ZERO);
//! assert!(library.member("M002").unwrap().holds("B005"));
//! ```

mod library;
mod reservation;
mod types;

pub mod clock;
pub mod config;
pub mod receipt;
pub mod seed;
pub mod shell;

// Re-export public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LibraryConfig;
pub use library::{ErrorKind, Library, LibraryError, OverdueLoan};
pub use receipt::{BookAdded, Checkin, Checkout, MemberRegistered, Reserved};
pub use reservation::{Reservation, ReservationQueue};
pub use types::{Book, Field, Member, Money, ValidationError};
