//! The library registry: books, members, loans, reservations and fines.

use crate::clock::{Clock, SystemClock};
use crate::config::LibraryConfig;
use crate::receipt::{BookAdded, Checkin, Checkout, MemberRegistered, Reserved};
use crate::reservation::Reservation;
use crate::types::{Book, Member, Money, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Broad category of a failed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier collision on create, or a loan that already exists.
    DuplicateKey,
    /// Unknown member or book, or a book the member does not hold.
    NotFound,
    /// The member is at the loan limit.
    LimitExceeded,
    /// No free copies.
    Unavailable,
    /// Malformed input.
    Invalid,
}

/// Errors that can occur during library transactions.
///
/// A failed transaction never changes library state.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// A book with this ID already exists.
    DuplicateBook(String),
    /// A member with this ID already exists.
    DuplicateMember(String),
    /// No member with this ID.
    MemberNotFound(String),
    /// No book with this ID.
    BookNotFound(String),
    /// The member does not hold this book.
    NotBorrowed { member_id: String, book_id: String },
    /// The member already holds a copy of this book.
    AlreadyBorrowed { member_id: String, book_id: String },
    /// The member holds the maximum number of books.
    LimitExceeded { member_id: String, limit: usize },
    /// Every copy of the book is out.
    Unavailable(String),
    /// The loan period pushes the due date past what can be represented.
    DueDateOutOfRange { loan_period_days: u32 },
    /// Validation error.
    Validation(ValidationError),
}

impl LibraryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::DuplicateBook(_) | LibraryError::DuplicateMember(_) | LibraryError::AlreadyBorrowed { .. } => {
                ErrorKind::DuplicateKey
            }
            LibraryError::MemberNotFound(_) | LibraryError::BookNotFound(_) | LibraryError::NotBorrowed { .. } => {
                ErrorKind::NotFound
            }
            LibraryError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            LibraryError::Unavailable(_) => ErrorKind::Unavailable,
            LibraryError::Validation(_) | LibraryError::DueDateOutOfRange { .. } => ErrorKind::Invalid,
        }
    }
}

impl std::fmt::Display for LibraryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryError::DuplicateBook(id) => write!(f, "Book ID already exists: {}", id),
            LibraryError::DuplicateMember(id) => write!(f, "Member ID already exists: {}", id),
            LibraryError::MemberNotFound(id) => write!(f, "Invalid member ID: {}", id),
            LibraryError::BookNotFound(id) => write!(f, "Invalid book ID: {}", id),
            LibraryError::NotBorrowed { member_id, book_id } => {
                write!(f, "Member {} hasn't borrowed book {}", member_id, book_id)
            }
            LibraryError::AlreadyBorrowed { member_id, book_id } => {
                write!(f, "Member {} already has book {} on loan", member_id, book_id)
            }
            LibraryError::LimitExceeded { limit, .. } => {
                write!(f, "Member has reached the maximum borrowing limit ({} books).", limit)
            }
            LibraryError::Unavailable(id) => {
                write!(f, "All copies of book {} are currently checked out.", id)
            }
            LibraryError::DueDateOutOfRange { loan_period_days } => {
                write!(f, "loan period of {} days puts the due date out of range", loan_period_days)
            }
            LibraryError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for LibraryError {}

/// One loan past its due date, as of the time the report was made.
#[derive(Debug, Clone, Serialize)]
pub struct OverdueLoan<'a> {
    pub member: &'a Member,
    pub book: &'a Book,
    pub due: DateTime<Utc>,
    pub days_overdue: u32,
    /// What returning the book now would cost
    pub fine: Money,
}

/// The library registry.
///
/// Owns every book and member. Construct one at startup and pass it by
/// reference to whatever drives it.
pub struct Library {
    config: LibraryConfig,
    clock: Box<dyn Clock>,
    books: HashMap<String, Book>,
    members: HashMap<String, Member>,
    /// Book IDs in the order they were added
    catalog: Vec<String>,
    /// Member IDs in the order they registered
    roster: Vec<String>,
    /// Lower-cased title -> book IDs
    title_index: HashMap<String, HashSet<String>>,
    /// Lower-cased author -> book IDs
    author_index: HashMap<String, HashSet<String>>,
    next_reservation_seq: u64,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// An empty library with the default policy and the system clock.
    pub fn new() -> Self {
        Self::with_config(LibraryConfig::default())
    }

    pub fn with_config(config: LibraryConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: LibraryConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            clock: Box::new(clock),
            books: HashMap::new(),
            members: HashMap::new(),
            catalog: Vec::new(),
            roster: Vec::new(),
            title_index: HashMap::new(),
            author_index: HashMap::new(),
            next_reservation_seq: 0,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Current time according to the library's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Add a new title to the catalog with all copies on the shelf.
    pub fn add_book(
        &mut self,
        id: &str,
        title: &str,
        author: &str,
        total_copies: u32,
    ) -> Result<BookAdded, LibraryError> {
        let book = Book::new(id, title, author, total_copies);

        // Validate before touching any state
        book.validate().map_err(LibraryError::Validation)?;

        if self.books.contains_key(id) {
            return Err(LibraryError::DuplicateBook(id.to_string()));
        }

        self.title_index
            .entry(title.to_lowercase())
            .or_default()
            .insert(id.to_string());
        self.author_index
            .entry(author.to_lowercase())
            .or_default()
            .insert(id.to_string());
        self.catalog.push(id.to_string());
        self.books.insert(id.to_string(), book);

        log::info!("Added book {} '{}' ({} copies)", id, title, total_copies);

        Ok(BookAdded {
            book_id: id.to_string(),
            title: title.to_string(),
            total_copies,
        })
    }

    /// Register a new member with no loans and no fines.
    pub fn register_member(&mut self, id: &str, name: &str, email: &str) -> Result<MemberRegistered, LibraryError> {
        let member = Member::new(id, name, email);

        member.validate().map_err(LibraryError::Validation)?;

        if self.members.contains_key(id) {
            return Err(LibraryError::DuplicateMember(id.to_string()));
        }

        self.roster.push(id.to_string());
        self.members.insert(id.to_string(), member);

        log::info!("Registered member {} '{}'", id, name);

        Ok(MemberRegistered {
            member_id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// Lend a copy of a book to a member for one loan period.
    pub fn borrow_book(&mut self, member_id: &str, book_id: &str) -> Result<Checkout, LibraryError> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound(member_id.to_string()))?;
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()))?;

        if member.loan_count() >= self.config.max_loans {
            return Err(LibraryError::LimitExceeded {
                member_id: member_id.to_string(),
                limit: self.config.max_loans,
            });
        }
        if member.holds(book_id) {
            return Err(LibraryError::AlreadyBorrowed {
                member_id: member_id.to_string(),
                book_id: book_id.to_string(),
            });
        }
        if !book.is_available() {
            return Err(LibraryError::Unavailable(book_id.to_string()));
        }

        let due = self
            .clock
            .now()
            .checked_add_signed(self.config.loan_period())
            .ok_or(LibraryError::DueDateOutOfRange {
                loan_period_days: self.config.loan_period_days,
            })?;
        book.available_copies -= 1;
        member.loans.insert(book_id.to_string(), due);

        log::info!(
            "Member {} borrowed {} ({}/{} left), due {}",
            member_id,
            book_id,
            book.available_copies,
            book.total_copies,
            due
        );

        Ok(Checkout {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            title: book.title.clone(),
            due,
        })
    }

    /// Take a book back, charge any overdue fine, and hand the copy to the
    /// next reserving member if there is one.
    ///
    /// Only the earliest reservation is tried. If that member cannot take the
    /// book the reservation is still consumed and the copy stays on the shelf.
    pub fn return_book(&mut self, member_id: &str, book_id: &str) -> Result<Checkin, LibraryError> {
        let now = self.clock.now();
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound(member_id.to_string()))?;
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()))?;
        let due = member.due_date(book_id).ok_or_else(|| LibraryError::NotBorrowed {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
        })?;

        let days_overdue = overdue_days(due, now);
        let fine = self.config.fine_per_day().times(u64::from(days_overdue));
        member.fines += fine;
        member.loans.remove(book_id);
        book.available_copies += 1;

        log::info!(
            "Member {} returned {} ({} days overdue, fine {})",
            member_id,
            book_id,
            days_overdue,
            fine
        );

        let title = book.title.clone();
        let next = book.reservations.pop();

        let handoff = next.and_then(|reservation| match self.borrow_book(&reservation.member_id, book_id) {
            Ok(checkout) => {
                log::info!("Handed {} to reserving member {}", book_id, reservation.member_id);
                Some(checkout)
            }
            Err(e) => {
                log::info!(
                    "Reservation for {} by {} could not be filled: {}",
                    book_id,
                    reservation.member_id,
                    e
                );
                None
            }
        });

        Ok(Checkin {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            title,
            days_overdue,
            fine,
            handoff,
        })
    }

    /// Queue a member for the next free copy of a book.
    ///
    /// Accepted even when copies are on the shelf or the member is already
    /// queued.
    pub fn reserve_book(&mut self, member_id: &str, book_id: &str) -> Result<Reserved, LibraryError> {
        if !self.members.contains_key(member_id) {
            return Err(LibraryError::MemberNotFound(member_id.to_string()));
        }
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::BookNotFound(book_id.to_string()))?;

        let seq = self.next_reservation_seq;
        self.next_reservation_seq += 1;

        let position = book.reservations.push(Reservation {
            requested_at: self.clock.now(),
            seq,
            member_id: member_id.to_string(),
        });

        log::info!("Member {} reserved {} (position {})", member_id, book_id, position);

        Ok(Reserved {
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            title: book.title.clone(),
            position,
        })
    }

    /// Find books by exact title and/or author, ignoring case.
    ///
    /// Absent or empty filters are skipped. Matches from both filters are
    /// merged, each book appearing once, in catalog order.
    pub fn search_books(&self, title: Option<&str>, author: Option<&str>) -> Vec<&Book> {
        let mut matched: HashSet<&str> = HashSet::new();

        for (filter, index) in [(title, &self.title_index), (author, &self.author_index)] {
            let Some(key) = filter.filter(|f| !f.is_empty()) else {
                continue;
            };
            if let Some(ids) = index.get(&key.to_lowercase()) {
                matched.extend(ids.iter().map(String::as_str));
            }
        }

        log::debug!("Search title={:?} author={:?}: {} match(es)", title, author, matched.len());

        self.catalog
            .iter()
            .filter(|id| matched.contains(id.as_str()))
            .filter_map(|id| self.books.get(id))
            .collect()
    }

    /// Every loan past its due date, with the fine it would incur today.
    ///
    /// Fines are only charged on return; this report changes nothing.
    pub fn get_overdue_books(&self) -> Vec<OverdueLoan<'_>> {
        let now = self.clock.now();
        let fine_per_day = self.config.fine_per_day();

        self.members()
            .flat_map(move |member| {
                member
                    .loans
                    .iter()
                    .filter(move |(_, due)| now > **due)
                    .filter_map(move |(book_id, due)| {
                        let book = self.books.get(book_id)?;
                        let days_overdue = overdue_days(*due, now);
                        Some(OverdueLoan {
                            member,
                            book,
                            due: *due,
                            days_overdue,
                            fine: fine_per_day.times(u64::from(days_overdue)),
                        })
                    })
            })
            .collect()
    }

    /// Get a book by ID.
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    /// Get a member by ID.
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// All books in the order they were added.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.catalog.iter().filter_map(|id| self.books.get(id))
    }

    /// All members in the order they registered.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.roster.iter().filter_map(|id| self.members.get(id))
    }
}

/// Whole days elapsed since `due`, or zero if it has not passed.
fn overdue_days(due: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    if now <= due {
        return 0;
    }
    u32::try_from((now - due).num_days()).unwrap_or(u32::MAX)
}
