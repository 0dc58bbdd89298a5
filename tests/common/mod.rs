//! Shared test infrastructure for libdesk integration tests.
//!
//! Provides TestEnv: a seeded library driven by a manual clock.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use libdesk::{Checkin, Checkout, Library, LibraryConfig, ManualClock, Money, seed};

/// Test environment: the sample catalog and members, at a fixed instant.
pub struct TestEnv {
    pub clock: ManualClock,
    pub library: Library,
}

impl TestEnv {
    /// Create a library loaded with the sample data.
    pub fn new() -> Self {
        Self::with_config(LibraryConfig::default())
    }

    /// Create a seeded library with a custom policy.
    pub fn with_config(config: LibraryConfig) -> Self {
        let mut env = Self::empty_with_config(config);
        seed::load_sample_data(&mut env.library).expect("Failed to load sample data");
        env
    }

    /// Create a library with no books or members.
    pub fn empty() -> Self {
        Self::empty_with_config(LibraryConfig::default())
    }

    fn empty_with_config(config: LibraryConfig) -> Self {
        let clock = ManualClock::new(start_time());
        let library = Library::with_clock(config, clock.clone());
        Self { clock, library }
    }

    /// Move time forward by whole days.
    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }

    /// Borrow, panicking on failure.
    pub fn borrow(&mut self, member_id: &str, book_id: &str) -> Checkout {
        self.library
            .borrow_book(member_id, book_id)
            .expect("Failed to borrow book")
    }

    /// Return, panicking on failure.
    pub fn return_book(&mut self, member_id: &str, book_id: &str) -> Checkin {
        self.library
            .return_book(member_id, book_id)
            .expect("Failed to return book")
    }

    /// Reserve, panicking on failure.
    pub fn reserve(&mut self, member_id: &str, book_id: &str) {
        self.library
            .reserve_book(member_id, book_id)
            .expect("Failed to reserve book");
    }

    pub fn available(&self, book_id: &str) -> u32 {
        self.library.book(book_id).expect("Book not found").available_copies
    }

    pub fn fines(&self, member_id: &str) -> Money {
        self.library.member(member_id).expect("Member not found").fines
    }

    pub fn loan_count(&self, member_id: &str) -> usize {
        self.library.member(member_id).expect("Member not found").loan_count()
    }

    pub fn queue_len(&self, book_id: &str) -> usize {
        self.library.book(book_id).expect("Book not found").reservations.len()
    }

    /// Serialized view of every book and member, for before/after comparisons.
    pub fn snapshot(&self) -> String {
        let books: Vec<_> = self.library.books().collect();
        let members: Vec<_> = self.library.members().collect();
        serde_json::to_string(&(books, members)).expect("Failed to serialize library")
    }

    /// Assert the copy-count invariants for every book.
    pub fn assert_consistent(&self) {
        for book in self.library.books() {
            assert!(
                book.available_copies <= book.total_copies,
                "Book {} has {} available of {}",
                book.id,
                book.available_copies,
                book.total_copies
            );

            let holders = self.library.members().filter(|m| m.holds(&book.id)).count();
            assert_eq!(
                book.on_loan() as usize,
                holders,
                "Book {} has {} copies out but {} holders",
                book.id,
                book.on_loan(),
                holders
            );
        }

        for member in self.library.members() {
            assert!(member.loan_count() <= self.library.config().max_loans);
            for book_id in member.loans.keys() {
                assert!(
                    self.library.book(book_id).is_some(),
                    "Member {} holds unknown book {}",
                    member.id,
                    book_id
                );
            }
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// The instant every TestEnv starts at.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap()
}
