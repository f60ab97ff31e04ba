//! Messenger Data Operations
//!
//! One function per feature action, each a thin parameterized statement (or
//! explicit transaction) against the external messenger schema:
//! `usr`, `user_list`, `user_list_contains`, `chat`, `chat_list`, `message`,
//! plus the `user_list_list_id_seq` sequence. The schema is assumed
//! pre-created; nothing here issues DDL.
//!
//! Multi-statement sequences (account creation, contact/block swaps) run
//! inside a single transaction so a partial failure leaves no orphan rows.

use tracing::debug;

use crate::db::Db;
use crate::error::{ChitterError, Result};

/// A chat the user is a member of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    /// Chat id, stringified for display
    pub id: String,
    /// Chat type (`private`, `group`)
    pub kind: String,
    /// Login that initiated the chat
    pub init_sender: String,
}

/// One message row, most fields already display-formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: String,
    pub body: String,
    pub timestamp: String,
    pub sender: String,
}

/// Which per-user list an operation targets
///
/// Contact and block membership are mutually exclusive: adding to one side
/// removes any membership on the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Contact,
    Block,
}

impl ListKind {
    /// Column on `usr` holding the id of this list
    pub const fn list_column(self) -> &'static str {
        match self {
            Self::Contact => "contact_list",
            Self::Block => "block_list",
        }
    }

    /// The mutually exclusive counterpart
    pub const fn opposite(self) -> Self {
        match self {
            Self::Contact => Self::Block,
            Self::Block => Self::Contact,
        }
    }

    /// Section title for the menu that adds to this list
    pub const fn add_menu_title(self) -> &'static str {
        match self {
            Self::Contact => "Add a New Contact",
            Self::Block => "Block a Contact",
        }
    }
}

/// Create a new account: one `block` list, one `contact` list, then the user
/// row referencing both.
///
/// Runs in a single transaction. The list ids come from
/// `user_list_list_id_seq` via `currval` after each insert, which is stable
/// within the transaction's session. Does not log the new user in.
pub async fn create_user(db: &mut Db, login: &str, password: &str, phone: &str) -> Result<()> {
    let tx = db.transaction().await?;

    tx.execute("INSERT INTO user_list (list_type) VALUES ('block')", &[])
        .await
        .map_err(|e| ChitterError::from_db(&e))?;
    let row = tx
        .query_one("SELECT currval('user_list_list_id_seq')::int", &[])
        .await
        .map_err(|e| ChitterError::from_db(&e))?;
    let block_id: i32 = row.get(0);

    tx.execute("INSERT INTO user_list (list_type) VALUES ('contact')", &[])
        .await
        .map_err(|e| ChitterError::from_db(&e))?;
    let row = tx
        .query_one("SELECT currval('user_list_list_id_seq')::int", &[])
        .await
        .map_err(|e| ChitterError::from_db(&e))?;
    let contact_id: i32 = row.get(0);

    tx.execute(
        "INSERT INTO usr (phonenum, login, password, block_list, contact_list) \
         VALUES ($1, $2, $3, $4, $5)",
        &[&phone, &login, &password, &block_id, &contact_id],
    )
    .await
    .map_err(|e| ChitterError::from_db(&e))?;

    tx.commit().await.map_err(|e| ChitterError::from_db(&e))?;
    debug!(login, "account created");
    Ok(())
}

/// Check login credentials against an exact-match predicate.
///
/// True only if a `usr` row with this login and password exists.
pub async fn check_credentials(db: &Db, login: &str, password: &str) -> Result<bool> {
    db.exists("SELECT 1 FROM usr WHERE login = $1 AND password = $2", &[&login, &password]).await
}

/// True if a user with this login exists
pub async fn user_exists(db: &Db, login: &str) -> Result<bool> {
    db.exists("SELECT 1 FROM usr WHERE login = $1", &[&login]).await
}

/// Add `other` to one of `owner`'s lists, removing any membership in the
/// opposite list first.
///
/// Both statements run in one transaction. A duplicate membership surfaces as
/// [`ChitterError::Duplicate`]; the caller translates it to a friendly
/// message. Membership is one-directional: `other`'s own lists are untouched.
pub async fn add_to_list(db: &mut Db, owner: &str, other: &str, kind: ListKind) -> Result<()> {
    // Column names cannot be bound as parameters; they come from the fixed
    // ListKind table, never from input.
    let remove_sql = format!(
        "DELETE FROM user_list_contains \
         WHERE list_id = (SELECT {} FROM usr WHERE login = $1) \
         AND list_member = $2",
        kind.opposite().list_column()
    );
    let insert_sql = format!(
        "INSERT INTO user_list_contains (list_id, list_member) \
         VALUES ((SELECT {} FROM usr WHERE login = $1), $2)",
        kind.list_column()
    );

    let tx = db.transaction().await?;
    tx.execute(&remove_sql, &[&owner, &other]).await.map_err(|e| ChitterError::from_db(&e))?;
    tx.execute(&insert_sql, &[&owner, &other]).await.map_err(|e| ChitterError::from_db(&e))?;
    tx.commit().await.map_err(|e| ChitterError::from_db(&e))?;

    debug!(owner, other, ?kind, "list membership updated");
    Ok(())
}

/// Logins in one of `owner`'s lists, alphabetical
pub async fn list_members(db: &Db, owner: &str, kind: ListKind) -> Result<Vec<String>> {
    let sql = format!(
        "SELECT ulc.list_member FROM user_list_contains ulc \
         JOIN usr u ON u.{} = ulc.list_id \
         WHERE u.login = $1 ORDER BY ulc.list_member",
        kind.list_column()
    );

    let rows = db.query_rows(&sql, &[&owner]).await?;
    Ok(rows.into_iter().filter_map(|mut row| {
        if row.is_empty() { None } else { Some(row.swap_remove(0)) }
    }).collect())
}

/// Chats the login is a member of
pub async fn chats(db: &Db, login: &str) -> Result<Vec<ChatSummary>> {
    let rows = db
        .query_rows(
            "SELECT c.chat_id, c.chat_type, c.init_sender FROM chat c \
             JOIN chat_list cl ON c.chat_id = cl.chat_id \
             WHERE cl.member = $1 ORDER BY c.chat_id",
            &[&login],
        )
        .await?;

    rows.into_iter()
        .map(|row| {
            let mut it = row.into_iter();
            match (it.next(), it.next(), it.next()) {
                (Some(id), Some(kind), Some(init_sender)) => {
                    Ok(ChatSummary { id, kind, init_sender })
                }
                _ => Err(ChitterError::query_failed("chat row missing columns")),
            }
        })
        .collect()
}

/// True if the login is a member of the chat
pub async fn is_chat_member(db: &Db, login: &str, chat_id: i32) -> Result<bool> {
    db.exists("SELECT 1 FROM chat_list WHERE member = $1 AND chat_id = $2", &[&login, &chat_id])
        .await
}

/// The most recent `limit` messages in a chat, newest first.
///
/// The renderer reverses them so the transcript reads oldest to newest.
pub async fn recent_messages(db: &Db, chat_id: i32, limit: i64) -> Result<Vec<MessageRow>> {
    let rows = db
        .query_rows(
            "SELECT msg_id, msg_text, msg_timestamp, sender_login FROM message \
             WHERE chat_id = $1 ORDER BY msg_timestamp DESC LIMIT $2",
            &[&chat_id, &limit],
        )
        .await?;

    rows.into_iter()
        .map(|row| {
            let mut it = row.into_iter();
            match (it.next(), it.next(), it.next(), it.next()) {
                (Some(id), Some(body), Some(timestamp), Some(sender)) => {
                    Ok(MessageRow { id, body, timestamp, sender })
                }
                _ => Err(ChitterError::query_failed("message row missing columns")),
            }
        })
        .collect()
}

/// Write a message to a chat, returning the assigned message id.
///
/// The id is `max(msg_id) + 1` computed inside the INSERT itself, so the
/// read and the write are one atomic statement. The tool remains a
/// single-session client; ids are not contended in practice.
pub async fn write_message(db: &Db, chat_id: i32, sender: &str, body: &str) -> Result<String> {
    let rows = db
        .query_rows(
            "INSERT INTO message (msg_id, msg_text, msg_timestamp, sender_login, chat_id) \
             SELECT COALESCE(MAX(msg_id), 0) + 1, $1, LOCALTIMESTAMP(0), $2, $3 FROM message \
             RETURNING msg_id",
            &[&body, &sender, &chat_id],
        )
        .await?;

    rows.into_iter()
        .next()
        .and_then(|mut row| if row.is_empty() { None } else { Some(row.swap_remove(0)) })
        .ok_or_else(|| ChitterError::query_failed("message insert returned no id"))
}

/// Fetch the text of a message, but only if id, chat, and sender all match.
///
/// This is the ownership check for delete/edit: `None` means the message is
/// not in this chat or not this user's.
pub async fn own_message_text(
    db: &Db,
    msg_id: i32,
    chat_id: i32,
    sender: &str,
) -> Result<Option<String>> {
    let rows = db
        .query_rows(
            "SELECT msg_text FROM message \
             WHERE msg_id = $1 AND chat_id = $2 AND sender_login = $3",
            &[&msg_id, &chat_id, &sender],
        )
        .await?;

    Ok(rows
        .into_iter()
        .next()
        .and_then(|mut row| if row.is_empty() { None } else { Some(row.swap_remove(0)) }))
}

/// Delete a message. The ownership predicate lives in the statement itself;
/// zero rows affected means nothing was (or could be) deleted.
pub async fn delete_message(db: &Db, msg_id: i32, chat_id: i32, sender: &str) -> Result<bool> {
    let affected = db
        .execute(
            "DELETE FROM message WHERE msg_id = $1 AND chat_id = $2 AND sender_login = $3",
            &[&msg_id, &chat_id, &sender],
        )
        .await?;
    Ok(affected > 0)
}

/// Replace a message's text, guarded by the same ownership predicate
pub async fn edit_message(
    db: &Db,
    msg_id: i32,
    chat_id: i32,
    sender: &str,
    new_body: &str,
) -> Result<bool> {
    let affected = db
        .execute(
            "UPDATE message SET msg_text = $1 \
             WHERE msg_id = $2 AND chat_id = $3 AND sender_login = $4",
            &[&new_body, &msg_id, &chat_id, &sender],
        )
        .await?;
    Ok(affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kind_columns() {
        assert_eq!(ListKind::Contact.list_column(), "contact_list");
        assert_eq!(ListKind::Block.list_column(), "block_list");
    }

    #[test]
    fn test_add_menu_titles() {
        assert_eq!(ListKind::Contact.add_menu_title(), "Add a New Contact");
        assert_eq!(ListKind::Block.add_menu_title(), "Block a Contact");
    }

    #[test]
    fn test_list_kinds_are_mutually_exclusive() {
        assert_eq!(ListKind::Contact.opposite(), ListKind::Block);
        assert_eq!(ListKind::Block.opposite(), ListKind::Contact);
        assert_eq!(ListKind::Contact.opposite().opposite(), ListKind::Contact);
    }
}
