//! Integration tests for the interactive shell.

mod common;

use common::TestEnv;
use libdesk::shell::{self, Reply};
use libdesk::Money;

fn run_script(env: &mut TestEnv, script: &str) -> String {
    let mut output = Vec::new();
    shell::run(&mut env.library, script.as_bytes(), &mut output, false).unwrap();
    String::from_utf8(output).unwrap()
}

fn info(reply: Option<Reply>) -> String {
    match reply {
        Some(Reply::Info(text)) => text,
        other => panic!("expected info reply, got {:?}", other),
    }
}

#[test]
fn test_script_borrow_and_return() {
    let mut env = TestEnv::new();

    let output = run_script(
        &mut env,
        "# checkout desk\n\
         borrow M001 B005\n\
         return M001 B005\n",
    );

    assert!(output.contains("Book 'The Hobbit' borrowed successfully. Due date: 2024-03-18"));
    assert!(output.contains("Book 'The Hobbit' returned successfully. Fine: $0.00"));
    assert_eq!(env.available("B005"), 2);
}

#[test]
fn test_script_add_book_with_quotes() {
    let mut env = TestEnv::empty();

    let output = run_script(&mut env, "add-book B006 \"The Silmarillion\" 'J.R.R. Tolkien' 2\n");

    assert!(output.contains("Book 'The Silmarillion' added successfully."));
    let book = env.library.book("B006").unwrap();
    assert_eq!(book.author, "J.R.R. Tolkien");
    assert_eq!(book.total_copies, 2);
}

#[test]
fn test_script_stops_at_quit() {
    let mut env = TestEnv::new();

    run_script(&mut env, "borrow M001 B001\nquit\nborrow M001 B002\n");

    assert_eq!(env.loan_count("M001"), 1);
}

#[test]
fn test_script_failure_keeps_going() {
    let mut env = TestEnv::new();

    let output = run_script(&mut env, "borrow M404 B001\nborrow M001 B001\n");

    assert!(output.contains("Invalid member ID: M404"));
    assert!(output.contains("borrowed successfully"));
    assert_eq!(env.loan_count("M001"), 1);
}

#[test]
fn test_reserve_reply_shows_position() {
    let mut env = TestEnv::new();

    shell::execute(&mut env.library, "reserve M001 B002");
    let reply = shell::execute(&mut env.library, "reserve M002 B002");

    match reply {
        Some(Reply::Success(msg)) => assert!(msg.ends_with("(queue position 2)")),
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn test_handoff_reply() {
    let mut env = TestEnv::new();
    env.borrow("M001", "B005");
    env.borrow("M002", "B005");

    shell::execute(&mut env.library, "reserve M003 B005");
    let reply = shell::execute(&mut env.library, "return M002 B005");

    match reply {
        Some(Reply::Success(msg)) => {
            assert!(msg.contains("Book automatically checked out to reserved member (ID: M003)"))
        }
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn test_search_table() {
    let mut env = TestEnv::new();

    let text = info(shell::execute(
        &mut env.library,
        "search --title 'the hobbit' --author 'J.R.R. Tolkien'",
    ));

    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().nth(1).unwrap().starts_with("B005"));
}

#[test]
fn test_search_json() {
    let mut env = TestEnv::new();

    let text = info(shell::execute(&mut env.library, "search --author 'harper lee' --json"));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], "B002");
    assert_eq!(json[0]["available_copies"], 2);
}

#[test]
fn test_members_table_shows_fines() {
    let mut env = TestEnv::new();
    env.borrow("M002", "B001");
    env.advance_days(16);
    env.return_book("M002", "B001");

    let text = info(shell::execute(&mut env.library, "members"));

    let bob = text.lines().find(|l| l.starts_with("M002")).unwrap();
    assert!(bob.contains("$1.00"));
    assert_eq!(env.fines("M002"), Money::from_cents(100));
}

#[test]
fn test_overdue_report_and_json() {
    let mut env = TestEnv::new();

    assert_eq!(info(shell::execute(&mut env.library, "overdue")), "No overdue books");

    env.borrow("M003", "B004");
    env.advance_days(17);

    let text = info(shell::execute(&mut env.library, "overdue"));
    assert!(text.contains("Charlie Brown"));
    assert!(text.contains("Pride and Prejudice"));

    let json: serde_json::Value =
        serde_json::from_str(&info(shell::execute(&mut env.library, "overdue --json"))).unwrap();
    assert_eq!(json[0]["days_overdue"], 3);
    assert_eq!(json[0]["fine"], 150);
    assert_eq!(json[0]["member"]["id"], "M003");

    // Reports never charge
    assert_eq!(env.fines("M003"), Money::ZERO);
}

#[test]
fn test_book_detail_lists_queue() {
    let mut env = TestEnv::new();
    env.reserve("M002", "B003");
    env.advance_days(1);
    env.reserve("M001", "B003");

    let text = info(shell::execute(&mut env.library, "book B003"));

    assert!(text.contains("Title: 1984"));
    assert!(text.contains("1. M002"));
    assert!(text.contains("2. M001"));
}

#[test]
fn test_member_detail_flags_overdue() {
    let mut env = TestEnv::new();
    env.borrow("M001", "B001");
    env.advance_days(5);
    env.borrow("M001", "B002");
    env.advance_days(10);

    let text = info(shell::execute(&mut env.library, "member M001"));

    let gatsby = text.lines().find(|l| l.contains("B001")).unwrap();
    let mockingbird = text.lines().find(|l| l.contains("B002")).unwrap();
    assert!(gatsby.ends_with("OVERDUE"));
    assert!(!mockingbird.ends_with("OVERDUE"));
}

#[test]
fn test_unknown_detail_is_failure() {
    let mut env = TestEnv::new();

    assert_eq!(
        shell::execute(&mut env.library, "member M404"),
        Some(Reply::Failure("Invalid member ID: M404".to_string()))
    );
}

#[test]
fn test_unknown_command_is_failure() {
    let mut env = TestEnv::new();

    match shell::execute(&mut env.library, "lend M001 B001") {
        Some(Reply::Failure(msg)) => assert!(msg.contains("lend")),
        other => panic!("unexpected reply: {:?}", other),
    }
}
