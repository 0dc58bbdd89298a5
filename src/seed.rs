//! Sample catalog and members loaded when the desk starts.

use crate::library::{Library, LibraryError};

/// (id, title, author, copies)
pub const SAMPLE_BOOKS: [(&str, &str, &str, u32); 5] = [
    ("B001", "The Great Gatsby", "F. Scott Fitzgerald", 3),
    ("B002", "To Kill a Mockingbird", "Harper Lee", 2),
    ("B003", "1984", "George Orwell", 4),
    ("B004", "Pride and Prejudice", "Jane Austen", 3),
    ("B005", "The Hobbit", "J.R.R. Tolkien", 2),
];

/// (id, name, email)
pub const SAMPLE_MEMBERS: [(&str, &str, &str); 3] = [
    ("M001", "Alice Johnson", "alice@example.com"),
    ("M002", "Bob Smith", "bob@example.com"),
    ("M003", "Charlie Brown", "charlie@example.com"),
];

/// Add the sample books and members.
///
/// Fails on the first collision, e.g. when called twice on the same library.
pub fn load_sample_data(library: &mut Library) -> Result<(), LibraryError> {
    for (id, title, author, copies) in SAMPLE_BOOKS {
        library.add_book(id, title, author, copies)?;
    }
    for (id, name, email) in SAMPLE_MEMBERS {
        library.register_member(id, name, email)?;
    }
    log::info!(
        "Loaded {} sample books and {} sample members",
        SAMPLE_BOOKS.len(),
        SAMPLE_MEMBERS.len()
    );
    Ok(())
}
