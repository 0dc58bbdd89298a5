//! Line-oriented front end for the circulation desk.
//!
//! Each input line is one command. Words are split on whitespace; single or
//! double quotes group words that contain spaces:
//!
//! ```text
//! add-book B006 "The Silmarillion" "J.R.R. Tolkien" 2
//! borrow M001 B006
//! search --author "j.r.r. tolkien"
//! ```

use crate::library::{Library, LibraryError, OverdueLoan};
use crate::types::{Book, Member};
use clap::error::ErrorKind as ClapErrorKind;
use clap::{Parser, Subcommand};
use colored::*;
use eyre::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "libdesk", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands understood by the shell.
#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Add a book to the catalog
    AddBook {
        /// Book ID
        id: String,
        /// Title
        title: String,
        /// Author
        author: String,
        /// Number of copies
        copies: u32,
    },

    /// Register a new member
    Register {
        /// Member ID
        id: String,
        /// Full name
        name: String,
        /// Email address
        email: String,
    },

    /// Lend a book to a member
    Borrow { member_id: String, book_id: String },

    /// Take a book back from a member
    Return { member_id: String, book_id: String },

    /// Queue a member for the next free copy of a book
    Reserve { member_id: String, book_id: String },

    /// Search by exact title and/or author (case-insensitive)
    Search {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the catalog
    Books {
        #[arg(long)]
        json: bool,
    },

    /// List the members
    Members {
        #[arg(long)]
        json: bool,
    },

    /// Show one book and its reservation queue
    Book { id: String },

    /// Show one member and their loans
    Member { id: String },

    /// Report loans past their due date
    Overdue {
        #[arg(long)]
        json: bool,
    },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// What the shell has to say about one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A transaction went through.
    Success(String),
    /// A transaction or command was rejected.
    Failure(String),
    /// Listings, reports and help text.
    Info(String),
    /// The user asked to leave.
    Quit,
}

impl From<LibraryError> for Reply {
    fn from(e: LibraryError) -> Self {
        Reply::Failure(e.to_string())
    }
}

/// Parse and run one input line. Blank lines and `#` comments yield `None`.
pub fn execute(library: &mut Library, line: &str) -> Option<Reply> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let words = match split_words(line) {
        Ok(words) => words,
        Err(e) => return Some(Reply::Failure(e)),
    };

    let reply = match ShellLine::try_parse_from(words) {
        Ok(parsed) => run_command(library, parsed.command),
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Reply::Info(e.to_string().trim_end().to_string())
            }
            _ => Reply::Failure(e.to_string().trim_end().to_string()),
        },
    };
    Some(reply)
}

/// Run a parsed command against the library.
pub fn run_command(library: &mut Library, command: ShellCommand) -> Reply {
    log::debug!("Shell command: {:?}", command);

    match command {
        ShellCommand::AddBook {
            id,
            title,
            author,
            copies,
        } => match library.add_book(&id, &title, &author, copies) {
            Ok(receipt) => Reply::Success(receipt.to_string()),
            Err(e) => e.into(),
        },

        ShellCommand::Register { id, name, email } => match library.register_member(&id, &name, &email) {
            Ok(receipt) => Reply::Success(receipt.to_string()),
            Err(e) => e.into(),
        },

        ShellCommand::Borrow { member_id, book_id } => match library.borrow_book(&member_id, &book_id) {
            Ok(receipt) => Reply::Success(receipt.to_string()),
            Err(e) => e.into(),
        },

        ShellCommand::Return { member_id, book_id } => match library.return_book(&member_id, &book_id) {
            Ok(receipt) => Reply::Success(receipt.to_string()),
            Err(e) => e.into(),
        },

        ShellCommand::Reserve { member_id, book_id } => match library.reserve_book(&member_id, &book_id) {
            Ok(receipt) => Reply::Success(format!("{} (queue position {})", receipt, receipt.position)),
            Err(e) => e.into(),
        },

        ShellCommand::Search { title, author, json } => {
            let results = library.search_books(title.as_deref(), author.as_deref());
            if json {
                render_json(&results)
            } else if results.is_empty() {
                Reply::Info("No books found matching your criteria".to_string())
            } else {
                Reply::Info(book_table(&results))
            }
        }

        ShellCommand::Books { json } => {
            let books: Vec<&Book> = library.books().collect();
            if json {
                render_json(&books)
            } else if books.is_empty() {
                Reply::Info("No books in the catalog".to_string())
            } else {
                Reply::Info(book_table(&books))
            }
        }

        ShellCommand::Members { json } => {
            let members: Vec<&Member> = library.members().collect();
            if json {
                render_json(&members)
            } else if members.is_empty() {
                Reply::Info("No registered members".to_string())
            } else {
                Reply::Info(member_table(&members))
            }
        }

        ShellCommand::Book { id } => match library.book(&id) {
            Some(book) => Reply::Info(book_detail(book)),
            None => LibraryError::BookNotFound(id).into(),
        },

        ShellCommand::Member { id } => match library.member(&id) {
            Some(member) => Reply::Info(member_detail(member, library)),
            None => LibraryError::MemberNotFound(id).into(),
        },

        ShellCommand::Overdue { json } => {
            let overdue = library.get_overdue_books();
            if json {
                render_json(&overdue)
            } else if overdue.is_empty() {
                Reply::Info("No overdue books".to_string())
            } else {
                Reply::Info(overdue_table(&overdue))
            }
        }

        ShellCommand::Quit => Reply::Quit,
    }
}

/// Read commands from `input` until EOF or `quit`, writing replies to `output`.
pub fn run(library: &mut Library, input: impl BufRead, output: &mut impl Write, prompt: bool) -> Result<()> {
    let mut lines = input.lines();

    loop {
        if prompt {
            write!(output, "{} ", "libdesk>".bold()).context("Failed to write prompt")?;
            output.flush().context("Failed to flush output")?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        match execute(library, &line) {
            None => {}
            Some(Reply::Success(msg)) => writeln!(output, "{} {}", "✓".green(), msg)?,
            Some(Reply::Failure(msg)) => writeln!(output, "{} {}", "✗".red(), msg)?,
            Some(Reply::Info(msg)) => writeln!(output, "{}", msg)?,
            Some(Reply::Quit) => break,
        }
    }

    log::info!("Shell finished");
    Ok(())
}

/// Split a command line into words, honouring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> Reply {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Reply::Info(json),
        Err(e) => Reply::Failure(format!("Failed to render JSON: {}", e)),
    }
}

fn book_table(books: &[&Book]) -> String {
    let header = format!(
        "{:<8} {:<30} {:<24} {:>9} {:>5}",
        "ID", "Title", "Author", "Available", "Total"
    );
    let rows = books.iter().map(|book| {
        format!(
            "{:<8} {:<30} {:<24} {:>9} {:>5}",
            book.id, book.title, book.author, book.available_copies, book.total_copies
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

fn member_table(members: &[&Member]) -> String {
    let header = format!(
        "{:<8} {:<20} {:<28} {:>8} {:>8}",
        "ID", "Name", "Email", "Borrowed", "Fines"
    );
    let rows = members.iter().map(|member| {
        format!(
            "{:<8} {:<20} {:<28} {:>8} {:>8}",
            member.id,
            member.name,
            member.email,
            member.loan_count(),
            member.fines.to_string()
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

fn overdue_table(overdue: &[OverdueLoan<'_>]) -> String {
    let header = format!(
        "{:<8} {:<20} {:<8} {:<30} {:<10} {:>4} {:>8}",
        "Member", "Name", "Book", "Title", "Due", "Days", "Fine"
    );
    let rows = overdue.iter().map(|loan| {
        format!(
            "{:<8} {:<20} {:<8} {:<30} {:<10} {:>4} {:>8}",
            loan.member.id,
            loan.member.name,
            loan.book.id,
            loan.book.title,
            loan.due.format("%Y-%m-%d").to_string(),
            loan.days_overdue,
            loan.fine.to_string()
        )
    });
    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

fn book_detail(book: &Book) -> String {
    let mut out = format!(
        "ID: {}\nTitle: {}\nAuthor: {}\nAvailable: {}/{}",
        book.id, book.title, book.author, book.available_copies, book.total_copies
    );
    if book.reservations.is_empty() {
        out.push_str("\nReservations: none");
    } else {
        out.push_str("\nReservations:");
        for (position, reservation) in book.reservations.ordered().iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. {} (since {})",
                position + 1,
                reservation.member_id,
                reservation.requested_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    out
}

fn member_detail(member: &Member, library: &Library) -> String {
    let now = library.now();
    let mut out = format!(
        "ID: {}\nName: {}\nEmail: {}\nFines: {}",
        member.id, member.name, member.email, member.fines
    );
    if member.loans.is_empty() {
        out.push_str("\nLoans: none");
    } else {
        out.push_str("\nLoans:");
        for (book_id, due) in &member.loans {
            let title = library.book(book_id).map(|b| b.title.as_str()).unwrap_or("?");
            let flag = if now > *due { " OVERDUE" } else { "" };
            out.push_str(&format!("\n  {} {} (due {}){}", book_id, title, due.format("%Y-%m-%d"), flag));
        }
    }
    out
}
