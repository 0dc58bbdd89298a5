//! Core data types for the circulation desk.

use crate::reservation::ReservationQueue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// A title held by the library, with one or more physical copies.
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    /// Unique identifier, e.g. "B001"
    pub id: String,

    pub title: String,

    pub author: String,

    /// Copies owned by the library
    pub total_copies: u32,

    /// Copies on the shelf right now (0 ≤ available ≤ total)
    pub available_copies: u32,

    /// Members waiting for a copy, earliest request first
    pub reservations: ReservationQueue,
}

impl Book {
    pub(crate) fn new(id: &str, title: &str, author: &str, total_copies: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            total_copies,
            available_copies: total_copies,
            reservations: ReservationQueue::new(),
        }
    }

    /// Number of copies currently out on loan.
    pub fn on_loan(&self) -> u32 {
        self.total_copies - self.available_copies
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Validate the book's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        validate_text(&self.title, Field::Title)?;
        validate_text(&self.author, Field::Author)?;
        Ok(())
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by {} (ID: {}, Available: {}/{})",
            self.title, self.author, self.id, self.available_copies, self.total_copies
        )
    }
}

/// A registered library patron.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    /// Unique identifier, e.g. "M001"
    pub id: String,

    pub name: String,

    pub email: String,

    /// Book ID -> due date for every book the member currently holds
    pub loans: BTreeMap<String, DateTime<Utc>>,

    /// Fines committed at return time; never decreases
    pub fines: Money,
}

impl Member {
    pub(crate) fn new(id: &str, name: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            loans: BTreeMap::new(),
            fines: Money::ZERO,
        }
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    pub fn holds(&self, book_id: &str) -> bool {
        self.loans.contains_key(book_id)
    }

    pub fn due_date(&self, book_id: &str) -> Option<DateTime<Utc>> {
        self.loans.get(book_id).copied()
    }

    /// Validate the member's fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        validate_text(&self.name, Field::Name)?;
        validate_text(&self.email, Field::Email)?;
        Ok(())
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ID: {}, Fines: {})", self.name, self.id, self.fines)
    }
}

/// A currency amount in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// This amount charged `times` times, saturating at the maximum.
    pub fn times(self, times: u64) -> Self {
        Money(self.0.saturating_mul(times))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Which text field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Name,
    Email,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Author => write!(f, "author"),
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
        }
    }
}

/// Validation errors for new books and members.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyId,
    InvalidId(String),
    Empty(Field),
    InvalidCharacters(Field),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyId => write!(f, "ID cannot be empty"),
            ValidationError::InvalidId(id) => {
                write!(f, "invalid ID '{}': must not contain whitespace or control characters", id)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidCharacters(field) => write!(f, "{} contains control characters", field),
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidId(id.to_string()));
    }
    Ok(())
}

fn validate_text(value: &str, field: Field) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters(field));
    }
    Ok(())
}
