//! Rendered Output Validation
//!
//! Exact-shape checks for the console presentation layer: the chat table,
//! the ASCII message bubbles, and the menus. These pin the layout so a
//! formatting regression shows up as a readable diff.

use pretty_assertions::assert_eq;

use chitter::render;
use chitter::{ChatSummary, MessageRow};

// ============================================================================
// Helpers
// ============================================================================

fn message(id: &str, sender: &str, body: &str) -> MessageRow {
    MessageRow {
        id: id.to_string(),
        body: body.to_string(),
        timestamp: "2024-03-01 12:30:00".to_string(),
        sender: sender.to_string(),
    }
}

// ============================================================================
// Chat table
// ============================================================================

#[test]
fn chat_table_aligns_columns() {
    let chats = vec![
        ChatSummary {
            id: "1".to_string(),
            kind: "private".to_string(),
            init_sender: "alice".to_string(),
        },
        ChatSummary {
            id: "12".to_string(),
            kind: "group".to_string(),
            init_sender: "bob".to_string(),
        },
    ];

    let expected = "\n\t===============================================\n\
                    \t   Chat ID  |  Chat Type  |  Initial Sender\n\
                    \t============|=============|====================\n\
                    \t     1      |   private   | alice\n\
                    \t     12     |    group    | bob\n\
                    \t===============================================\n";

    assert_eq!(render::chat_table(&chats), expected);
}

#[test]
fn chat_table_trims_padded_char_columns() {
    // char(n) columns arrive space-padded from the database
    let chats = vec![ChatSummary {
        id: "3".to_string(),
        kind: "private   ".to_string(),
        init_sender: "carol     ".to_string(),
    }];

    let table = render::chat_table(&chats);
    assert!(table.contains("| carol\n"));
    assert!(table.contains("   private   |"));
}

// ============================================================================
// Message bubbles
// ============================================================================

#[test]
fn other_senders_bubble_sits_flush_left() {
    let bubble = render::message_bubble(&message("3", "alice", "hello"), false);
    let lines: Vec<&str> = bubble.lines().collect();

    assert_eq!(lines[0], "[ 3 ]");
    assert_eq!(lines[1], format!(" {}", "_".repeat(37)));
    assert_eq!(lines[2], format!("| alice | 2024-03-01 12:30:00{} |", " ".repeat(8)));
    assert_eq!(lines[3], format!("|{}|", "~".repeat(37)));
    assert_eq!(lines[4], format!("| hello{} |", " ".repeat(30)));
    assert_eq!(lines[5], format!("| {} |", " ".repeat(35)));
    assert_eq!(lines[6], format!("| {}|", "_".repeat(36)));
    assert_eq!(lines[7], "|/");
    assert_eq!(lines[8], "'");
}

#[test]
fn own_bubble_is_tabbed_with_right_tail() {
    let bubble = render::message_bubble(&message("9", "alice", "hi"), true);
    let lines: Vec<&str> = bubble.lines().collect();

    for line in &lines {
        assert!(line.starts_with('\t'), "expected tab indent, got {line:?}");
    }
    assert_eq!(lines[0], "\t[ 9 ]");
    assert_eq!(lines[6], format!("\t|{} |", "_".repeat(36)));
    assert_eq!(lines[7], format!("\t{}\\|", " ".repeat(36)));
    assert_eq!(lines[8], format!("\t{}'", " ".repeat(37)));
}

#[test]
fn bubble_stretches_for_long_bodies() {
    let body = "this message is considerably longer than the minimum bubble width";
    let bubble = render::message_bubble(&message("1", "bob", body), false);

    let width = body.chars().count();
    assert!(bubble.contains(&format!("| {body} |")));
    assert!(bubble.contains(&"~".repeat(width + 2)));
}

// ============================================================================
// Transcript ordering
// ============================================================================

#[test]
fn transcript_renders_newest_last() {
    // Query order is newest first; the page reads oldest to newest
    let page = vec![
        message("3", "bob", "third"),
        message("2", "alice", "second"),
        message("1", "bob", "first"),
    ];

    let out = render::transcript(&page, "alice");
    let first = out.find("first").unwrap();
    let second = out.find("second").unwrap();
    let third = out.find("third").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn transcript_marks_only_viewers_messages_as_own() {
    let page = vec![message("2", "bob", "from bob"), message("1", "alice", "from alice")];
    let out = render::transcript(&page, "alice");

    for line in out.lines() {
        if line.contains("from alice") {
            assert!(line.starts_with('\t'));
        }
        if line.contains("from bob") {
            assert!(!line.starts_with('\t'));
        }
    }
}

// ============================================================================
// Menus and lists
// ============================================================================

#[test]
fn numbered_list_is_one_based() {
    let out = render::numbered_list(&["alice".to_string(), "bob".to_string(), "carol".to_string()]);
    assert_eq!(out, "\t1. alice\n\t2. bob\n\t3. carol\n");
}

#[test]
fn menus_carry_their_entries() {
    let top = render::top_menu();
    assert!(top.contains("1. Login"));
    assert!(top.contains("2. Create a New Account"));
    assert!(top.contains("9. < EXIT"));

    let user = render::user_menu("alice");
    assert!(user.contains("alice"));
    assert!(user.contains("1. Show Contacts"));
    assert!(user.contains("5. Block a User"));
    assert!(user.contains("9. Log out"));

    let chat = render::chat_options_menu("7");
    assert!(chat.contains("Chat #7 Options"));
    assert!(chat.contains("4. Load More Messages"));
}

#[test]
fn section_rules_match_title_width() {
    let title = "Your Contacts";
    let opener = render::menu_title(title);
    let closer = render::end_rule(title);

    assert!(opener.contains(&format!("{}{title}{}", "=".repeat(22), "=".repeat(22))));
    assert_eq!(closer.trim().chars().count(), 44 + title.chars().count());
}
