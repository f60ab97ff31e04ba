//! Console Presentation
//!
//! Every function here builds a `String`; printing happens at the call site.
//! That keeps the ASCII layout (menus, chat table, message bubbles) testable
//! without capturing stdout.

use crate::store::{ChatSummary, MessageRow};

/// Minimum inner width of a chat bubble, in characters
const BUBBLE_MIN_WIDTH: usize = 35;

/// Width of the `=` rule around section titles
const TITLE_RULE: usize = 22;

/// Startup banner
pub fn banner() -> String {
    let mut out = String::new();
    out.push_str("\n-------|--------------------------------------------------|---------\n");
    out.push_str("    ___|___                                            ___|___\n");
    out.push_str("   ////////\\   _                                  _   /\\\\\\\\\\\\\\\\\n");
    out.push_str("  ////////  \\ ('<        Chitter Chatter         >') /  \\\\\\\\\\\\\\\\\n");
    out.push_str("  | (_)  |  | (^)                                (^) |  | (_)  |\n");
    out.push_str("  |______|./==''==                              ==''===.|______|\n");
    out.push_str("--------------------------------------------------------------------\n");
    out
}

/// Section opener: the title between `=` rules
pub fn menu_title(title: &str) -> String {
    format!("\n\n{0}{title}{0}\n\n", "=".repeat(TITLE_RULE))
}

/// Section closer: a rule as wide as the opener
pub fn end_rule(title: &str) -> String {
    format!("\n{}\n\n", "=".repeat(TITLE_RULE * 2 + title.chars().count()))
}

/// Top-level menu (unauthenticated)
pub fn top_menu() -> String {
    "\n\n\t===================================\n\
     \t\tMAIN MENU\n\
     \t===================================\n\
     \t1. Login\n\
     \t2. Create a New Account\n\
     \t===================================\n\
     \t9. < EXIT\n"
        .to_string()
}

/// Authenticated user menu
pub fn user_menu(login: &str) -> String {
    format!(
        "\n\n\t===================================\n\
         \t\tMAIN MENU  ({login})\n\
         \t===================================\n\
         \t1. Show Contacts\n\
         \t2. Show Blocked List\n\
         \t3. Show Chat Interface\n\
         \t4. Add a New Contact\n\
         \t5. Block a User\n\
         \t===================================\n\
         \t9. Log out\n"
    )
}

/// Chat interface sub-menu
pub fn chat_interface_menu() -> String {
    "\n\n\t===================================\n\
     \t\tCHAT INTERFACE\n\
     \t===================================\n\
     \t1. Enter a Chat\n\
     \t2. Create a New Chat\n\
     \t===================================\n\
     \t9. Leave Chat Interface\n"
        .to_string()
}

/// Per-chat options menu
pub fn chat_options_menu(chat_id: &str) -> String {
    format!(
        "\n\tChat #{chat_id} Options\n\
         \t=======================\n\
         \t1. Write a New Message\n\
         \t2. Delete a Message\n\
         \t3. Edit a Message\n\
         \t4. Load More Messages\n\
         \t=======================\n\
         \t9. Exit Chat\n"
    )
}

/// Numbered list for contacts and blocked users
pub fn numbered_list(items: &[String]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("\t{}. {}\n", i + 1, item.trim()));
    }
    out
}

/// Chat overview table: id, type, initiating sender
pub fn chat_table(chats: &[ChatSummary]) -> String {
    let mut out = String::new();
    out.push_str("\n\t===============================================\n");
    out.push_str("\t   Chat ID  |  Chat Type  |  Initial Sender\n");
    out.push_str("\t============|=============|====================\n");
    for chat in chats {
        out.push_str(&format!(
            "\t{:^12}|{:^13}| {}\n",
            chat.id.trim(),
            chat.kind.trim(),
            chat.init_sender.trim()
        ));
    }
    out.push_str("\t===============================================\n");
    out
}

/// One ASCII chat bubble.
///
/// The viewer's own messages are indented a tab and get a right-hand tail;
/// everyone else's sit flush left with a left-hand tail. The bubble
/// stretches horizontally to fit the body.
pub fn message_bubble(msg: &MessageRow, own: bool) -> String {
    let body = msg.body.trim();
    let sender = msg.sender.trim();
    let timestamp = msg.timestamp.trim();

    let width = BUBBLE_MIN_WIDTH.max(body.chars().count());
    let tab = if own { "\t" } else { "" };

    let pad = |s: &str| {
        let fill = width.saturating_sub(s.chars().count());
        format!("{s}{}", " ".repeat(fill))
    };

    let mut out = String::new();
    out.push_str(&format!("{tab}[ {} ]\n", msg.id.trim()));
    out.push_str(&format!("{tab} {}\n", "_".repeat(width + 2)));
    out.push_str(&format!("{tab}| {} |\n", pad(&format!("{sender} | {timestamp}"))));
    out.push_str(&format!("{tab}|{}|\n", "~".repeat(width + 2)));
    out.push_str(&format!("{tab}| {} |\n", pad(body)));
    out.push_str(&format!("{tab}| {} |\n", " ".repeat(width)));

    if own {
        out.push_str(&format!("{tab}|{} |\n", "_".repeat(width + 1)));
        out.push_str(&format!("{tab}{}\\|\n", " ".repeat(width + 1)));
        out.push_str(&format!("{tab}{}'\n", " ".repeat(width + 2)));
    } else {
        out.push_str(&format!("| {}|\n", "_".repeat(width + 1)));
        out.push_str("|/\n");
        out.push_str("'\n");
    }

    out
}

/// Render a page of messages oldest-first.
///
/// `messages` arrives newest-first (that is how the query pages); the
/// transcript reads top to bottom in time order.
pub fn transcript(messages: &[MessageRow], viewer: &str) -> String {
    if messages.is_empty() {
        return "This chat has no messages.\n".to_string();
    }

    let mut out = String::new();
    for msg in messages.iter().rev() {
        out.push_str(&message_bubble(msg, msg.sender.trim() == viewer));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, sender: &str, body: &str) -> MessageRow {
        MessageRow {
            id: id.to_string(),
            body: body.to_string(),
            timestamp: "2024-03-01 12:30:00".to_string(),
            sender: sender.to_string(),
        }
    }

    #[test]
    fn test_bubble_width_never_shrinks_below_minimum() {
        let bubble = message_bubble(&msg("1", "alice", "hi"), false);
        let body_line = bubble.lines().nth(4).unwrap();
        assert_eq!(body_line.chars().count(), BUBBLE_MIN_WIDTH + 4);
    }

    #[test]
    fn test_bubble_stretches_to_long_body() {
        let body = "a".repeat(60);
        let bubble = message_bubble(&msg("1", "alice", &body), false);
        let body_line = bubble.lines().nth(4).unwrap();
        assert!(body_line.contains(&body));
        assert_eq!(body_line.chars().count(), 60 + 4);
    }

    #[test]
    fn test_own_bubble_is_indented() {
        let bubble = message_bubble(&msg("7", "me", "hello"), true);
        for line in bubble.lines() {
            assert!(line.starts_with('\t'), "own bubble line not indented: {line:?}");
        }
    }

    #[test]
    fn test_other_bubble_has_left_tail() {
        let bubble = message_bubble(&msg("7", "them", "hello"), false);
        assert!(bubble.contains("|/\n"));
        assert!(!bubble.contains('\t'));
    }

    #[test]
    fn test_transcript_reads_oldest_first() {
        let messages =
            vec![msg("2", "bob", "newest"), msg("1", "alice", "oldest")];
        let out = transcript(&messages, "alice");

        let oldest = out.find("oldest").unwrap();
        let newest = out.find("newest").unwrap();
        assert!(oldest < newest);
    }

    #[test]
    fn test_transcript_empty_state() {
        assert_eq!(transcript(&[], "alice"), "This chat has no messages.\n");
    }

    #[test]
    fn test_end_rule_tracks_title_length() {
        let short = end_rule("Login");
        let long = end_rule("Create a New Account");
        assert!(long.len() > short.len());
        assert_eq!(
            long.trim().chars().count(),
            TITLE_RULE * 2 + "Create a New Account".chars().count()
        );
    }

    #[test]
    fn test_numbered_list_trims_padded_logins() {
        let out = numbered_list(&["alice   ".to_string(), "bob".to_string()]);
        assert_eq!(out, "\t1. alice\n\t2. bob\n");
    }
}
