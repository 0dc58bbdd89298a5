//! Receipts returned by successful library transactions.
//!
//! Each receipt's `Display` is the status message shown at the desk.

use crate::types::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A book was added to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookAdded {
    pub book_id: String,
    pub title: String,
    pub total_copies: u32,
}

impl fmt::Display for BookAdded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book '{}' added successfully.", self.title)
    }
}

/// A member was registered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRegistered {
    pub member_id: String,
    pub name: String,
}

impl fmt::Display for MemberRegistered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member '{}' registered successfully.", self.name)
    }
}

/// A copy went out on loan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkout {
    pub member_id: String,
    pub book_id: String,
    pub title: String,
    pub due: DateTime<Utc>,
}

impl fmt::Display for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book '{}' borrowed successfully. Due date: {}",
            self.title,
            self.due.format("%Y-%m-%d")
        )
    }
}

/// A copy came back, possibly with a fine and an automatic hand-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkin {
    pub member_id: String,
    pub book_id: String,
    pub title: String,
    pub days_overdue: u32,
    /// Fine added to the member's balance by this return
    pub fine: Money,
    /// Loan made to the next reserving member, if the hand-off succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handoff: Option<Checkout>,
}

impl fmt::Display for Checkin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book '{}' returned successfully. Fine: {}", self.title, self.fine)?;
        if let Some(handoff) = &self.handoff {
            write!(
                f,
                "\nBook automatically checked out to reserved member (ID: {})",
                handoff.member_id
            )?;
        }
        Ok(())
    }
}

/// A member joined a book's reservation queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reserved {
    pub member_id: String,
    pub book_id: String,
    pub title: String,
    /// 1-based place in the queue at the time of reserving
    pub position: usize,
}

impl fmt::Display for Reserved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book '{}' reserved successfully. You'll be notified when available.",
            self.title
        )
    }
}
