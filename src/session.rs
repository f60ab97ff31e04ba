//! Session and Menu Control
//!
//! A strictly nested modal interface: top-level menu (login / create account
//! / exit) → authenticated menu (contacts, blocks, chat interface, logout) →
//! chat sub-menu (enter / create) → in-chat menu (write / delete / edit /
//! load more).
//!
//! The controller holds a single [`MenuState`] value. Each iteration of
//! [`run`] renders the current state's menu, reads a choice, runs the
//! matching handler, and feeds the handler's [`Event`] through
//! [`transition`] — the pure state machine is the thing the driver executes,
//! not a parallel model. The authenticated login lives inside the state
//! value; there is no shared mutable session.
//!
//! # Error policy
//! Database errors never cross a handler boundary: each handler logs the
//! failure, prints a message, and produces no event, so the same menu
//! redisplays. Only prompt failures (stdin gone) propagate, since the tool
//! cannot continue without a console.

use dialoguer::{Confirm, Input, Password};
use tracing::error;

use crate::db::Db;
use crate::error::{ChitterError, Result};
use crate::render;
use crate::store::{self, ListKind};

/// How many messages a chat shows before any "load more"
pub const DEFAULT_MESSAGE_LIMIT: i64 = 10;

/// How many more messages each "load more" adds
pub const LOAD_MORE_INCREMENT: i64 = 10;

/// An authenticated login name
pub type Login = String;

/// Where the menu controller currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    /// Top-level menu; nobody logged in
    Unauthenticated,
    /// Authenticated user menu
    Authenticated(Login),
    /// Chat interface: picking or creating a chat
    InChatList(Login),
    /// Inside one chat, with the current display limit
    InChat { login: Login, chat_id: i32, limit: i64 },
}

/// A state-machine input produced by a menu action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoginSucceeded(Login),
    LoginFailed,
    AccountCreated,
    Logout,
    EnterChatInterface,
    LeaveChatInterface,
    ChatPicked(i32),
    LoadMore,
    ExitChat,
}

/// Apply one event to the menu state.
///
/// Events that make no sense in the current state leave it unchanged, which
/// is exactly the "invalid input redisplays the same menu" behavior.
#[must_use]
pub fn transition(state: MenuState, event: Event) -> MenuState {
    match (state, event) {
        (MenuState::Unauthenticated, Event::LoginSucceeded(login)) => {
            MenuState::Authenticated(login)
        }
        (MenuState::Unauthenticated, Event::LoginFailed | Event::AccountCreated) => {
            MenuState::Unauthenticated
        }

        (MenuState::Authenticated(_), Event::Logout) => MenuState::Unauthenticated,
        (MenuState::Authenticated(login), Event::EnterChatInterface) => {
            MenuState::InChatList(login)
        }

        (MenuState::InChatList(login), Event::ChatPicked(chat_id)) => {
            MenuState::InChat { login, chat_id, limit: DEFAULT_MESSAGE_LIMIT }
        }
        (MenuState::InChatList(login), Event::LeaveChatInterface) => {
            MenuState::Authenticated(login)
        }

        (MenuState::InChat { login, chat_id, limit }, Event::LoadMore) => {
            MenuState::InChat { login, chat_id, limit: limit + LOAD_MORE_INCREMENT }
        }
        (MenuState::InChat { login, .. }, Event::ExitChat) => MenuState::InChatList(login),

        // No transition for anything else
        (state, _) => state,
    }
}

/// Parse a console line as a menu choice
#[must_use]
pub fn parse_choice(line: &str) -> Option<i32> {
    line.trim().parse().ok()
}

/// Log a recoverable failure and tell the user
fn report(err: &ChitterError) {
    error!(%err, "menu action failed");
    eprintln!("{err}");
}

/// Read one console line
fn prompt_line(prompt: &str) -> Result<String> {
    let value: String =
        Input::new().with_prompt(prompt).allow_empty(true).interact_text()?;
    Ok(value)
}

/// Read a password without echo
fn prompt_password(prompt: &str) -> Result<String> {
    let value = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    Ok(value)
}

/// Read menu choices until one parses as an integer.
///
/// Unrecognized but well-formed integers are the caller's problem; this only
/// guards against non-numeric input.
fn read_choice() -> Result<i32> {
    loop {
        let line = prompt_line("\nPlease make your choice")?;
        match parse_choice(&line) {
            Some(choice) => return Ok(choice),
            None => println!("\nYour input is invalid!"),
        }
    }
}

/// Render the menu belonging to the current state.
///
/// Inside a chat this includes the transcript page; a failed transcript
/// fetch is reported and the options menu still shows, so the user can exit.
async fn show_menu(db: &Db, state: &MenuState) {
    match state {
        MenuState::Unauthenticated => {
            print!("{}", render::banner());
            print!("{}", render::top_menu());
        }
        MenuState::Authenticated(login) => {
            print!("{}", render::banner());
            print!("{}", render::user_menu(login));
        }
        MenuState::InChatList(_) => {
            print!("{}", render::chat_interface_menu());
        }
        MenuState::InChat { login, chat_id, limit } => {
            let title = format!("Chat #{chat_id} Messages");
            print!("{}", render::menu_title(&title));

            match store::recent_messages(db, *chat_id, *limit).await {
                Ok(messages) => print!("{}", render::transcript(&messages, login)),
                Err(err) => report(&err),
            }

            print!("{}", render::end_rule(&title));
            print!("{}", render::chat_options_menu(&chat_id.to_string()));
        }
    }
}

/// Run the whole interactive session.
///
/// Returns when the user picks EXIT from the top menu; the caller tears down
/// the connection. Every state change goes through [`transition`]; handlers
/// that change nothing produce no event.
pub async fn run(db: &mut Db) -> Result<()> {
    let mut state = MenuState::Unauthenticated;

    loop {
        show_menu(db, &state).await;
        let choice = read_choice()?;

        let event = match (&state, choice) {
            (MenuState::Unauthenticated, 1) => match login_menu(db).await? {
                Some(login) => Some(Event::LoginSucceeded(login)),
                None => Some(Event::LoginFailed),
            },
            (MenuState::Unauthenticated, 2) => {
                create_account_menu(db).await?;
                Some(Event::AccountCreated)
            }
            (MenuState::Unauthenticated, 9) => break,
            (MenuState::Unauthenticated, _) => {
                println!("Unrecognized choice!");
                None
            }

            (MenuState::Authenticated(login), 1) => {
                show_list(db, login, ListKind::Contact).await?;
                None
            }
            (MenuState::Authenticated(login), 2) => {
                show_list(db, login, ListKind::Block).await?;
                None
            }
            (MenuState::Authenticated(_), 3) => Some(Event::EnterChatInterface),
            (MenuState::Authenticated(login), 4) => {
                add_to_list_menu(db, login, ListKind::Contact).await?;
                None
            }
            (MenuState::Authenticated(login), 5) => {
                add_to_list_menu(db, login, ListKind::Block).await?;
                None
            }
            (MenuState::Authenticated(_), 9) => Some(Event::Logout),
            (MenuState::Authenticated(_), _) => {
                println!("Invalid selection!");
                None
            }

            (MenuState::InChatList(login), 1) => {
                pick_chat(db, login).await?.map(Event::ChatPicked)
            }
            (MenuState::InChatList(_), 2) => {
                println!("\tCreating chats is not available yet.");
                None
            }
            (MenuState::InChatList(_), 9) => Some(Event::LeaveChatInterface),
            (MenuState::InChatList(_), _) => {
                println!("Unrecognized Choice!");
                None
            }

            (MenuState::InChat { login, chat_id, .. }, 1) => {
                write_message_menu(db, login, *chat_id).await?;
                None
            }
            (MenuState::InChat { login, chat_id, .. }, 2) => {
                delete_message_menu(db, login, *chat_id).await?;
                None
            }
            (MenuState::InChat { login, chat_id, .. }, 3) => {
                edit_message_menu(db, login, *chat_id).await?;
                None
            }
            (MenuState::InChat { .. }, 4) => {
                println!("\tPast messages have been loaded.");
                Some(Event::LoadMore)
            }
            (MenuState::InChat { .. }, 9) => Some(Event::ExitChat),
            (MenuState::InChat { .. }, _) => {
                println!("Unrecognized choice!");
                None
            }
        };

        if let Some(event) = event {
            state = transition(state, event);
        }
    }
    Ok(())
}

/// Login: exact-match credential check.
///
/// Query errors count as a failed login (logged, not raised).
async fn login_menu(db: &Db) -> Result<Option<Login>> {
    let title = "Login";
    print!("{}", render::menu_title(title));

    let login = prompt_line("\tEnter user login")?;
    let password = prompt_password("\tEnter user password")?;

    let outcome = match store::check_credentials(db, &login, &password).await {
        Ok(true) => Some(login),
        Ok(false) => {
            print!("Username or Password Incorrect");
            None
        }
        Err(err) => {
            report(&err);
            None
        }
    };

    print!("{}", render::end_rule(title));
    Ok(outcome)
}

/// Create a new account. Does not log the new user in.
async fn create_account_menu(db: &mut Db) -> Result<()> {
    let title = "Create a New Account";
    print!("{}", render::menu_title(title));

    let login = prompt_line("\tEnter user login")?;
    let password = prompt_password("\tEnter user password")?;
    let phone = prompt_line("\tEnter user phone")?;

    match store::create_user(db, &login, &password, &phone).await {
        Ok(()) => println!("User successfully created!"),
        Err(err) if err.is_duplicate() => println!("\tThat login is already taken."),
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}

/// Show the contact or block list
async fn show_list(db: &Db, login: &str, kind: ListKind) -> Result<()> {
    let title = match kind {
        ListKind::Contact => "Your Contacts",
        ListKind::Block => "Blocked Users",
    };
    print!("{}", render::menu_title(title));

    match store::list_members(db, login, kind).await {
        Ok(members) if members.is_empty() => match kind {
            ListKind::Contact => println!("\tYou have no contacts yet."),
            ListKind::Block => println!("\tYou haven't blocked anyone yet."),
        },
        Ok(members) => print!("{}", render::numbered_list(&members)),
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}

/// Add a contact or block a user.
///
/// Membership is mutually exclusive across the two lists and one-directional:
/// only the acting user's lists change.
async fn add_to_list_menu(db: &mut Db, login: &str, kind: ListKind) -> Result<()> {
    let title = kind.add_menu_title();
    print!("{}", render::menu_title(title));

    let other = prompt_line("\tEnter the user's login")?;

    match store::user_exists(db, &other).await {
        Ok(false) => println!("\n\t{other} doesn't exist!"),
        Ok(true) => match store::add_to_list(db, login, &other, kind).await {
            Ok(()) => match kind {
                ListKind::Contact => println!("\n\t{other} has been added to your contacts."),
                ListKind::Block => println!("\n\t{other} is now blocked."),
            },
            Err(err) if err.is_duplicate() => match kind {
                ListKind::Contact => println!("\n\t{other} is already in your contact list!"),
                ListKind::Block => println!("\n\t{other} is already blocked!"),
            },
            Err(err) => report(&err),
        },
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}

/// List the user's chats and prompt for one they are a member of.
///
/// Returns `None` when there is nothing to enter: no chats, or a database
/// failure either listing them or checking membership. The caller maps
/// `None` to no event, so control falls back to the chat-interface menu
/// instead of trapping the user at the prompt.
async fn pick_chat(db: &Db, login: &str) -> Result<Option<i32>> {
    let title = "Your Chats";
    print!("{}", render::menu_title(title));

    match store::chats(db, login).await {
        Ok(chats) if chats.is_empty() => {
            println!("You have no chats yet.");
            print!("{}", render::end_rule(title));
            return Ok(None);
        }
        Ok(chats) => print!("{}", render::chat_table(&chats)),
        Err(err) => {
            report(&err);
            print!("{}", render::end_rule(title));
            return Ok(None);
        }
    }
    print!("{}", render::end_rule(title));

    loop {
        let line = prompt_line("\tPlease pick a chat ID")?;
        let Some(id) = parse_choice(&line) else {
            println!("\tInvalid ID, please pick another!");
            continue;
        };
        match store::is_chat_member(db, login, id).await {
            Ok(true) => return Ok(Some(id)),
            Ok(false) => println!("\tInvalid ID, please pick another!"),
            Err(err) => {
                report(&err);
                return Ok(None);
            }
        }
    }
}

/// Write a new message to the current chat
async fn write_message_menu(db: &Db, login: &str, chat_id: i32) -> Result<()> {
    let title = "Write a New Message";
    print!("{}", render::menu_title(title));

    let body = prompt_line("\tEnter a message")?;

    match store::write_message(db, chat_id, login, &body).await {
        Ok(_) => println!("\n\tMessage was sent!"),
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}

/// Delete one of the user's own messages, with confirmation.
///
/// The message must belong to this chat and to this sender; anything else
/// gets an explicit error and nothing changes.
async fn delete_message_menu(db: &Db, login: &str, chat_id: i32) -> Result<()> {
    let title = "Delete a Message";
    print!("{}", render::menu_title(title));

    let line = prompt_line("\tSelect a message to delete")?;
    let Some(msg_id) = parse_choice(&line) else {
        println!("\tThat is not a message number.");
        print!("{}", render::end_rule(title));
        return Ok(());
    };

    match store::own_message_text(db, msg_id, chat_id, login).await {
        Ok(None) => println!(
            "\tError: You have either entered an invalid message # \
             or tried to delete another user's message."
        ),
        Ok(Some(body)) => {
            println!("\tMessage: {body}");
            let confirmed = Confirm::new()
                .with_prompt("\tAre you sure you want to delete this message?")
                .default(false)
                .interact()?;

            if confirmed {
                match store::delete_message(db, msg_id, chat_id, login).await {
                    Ok(true) => println!("\tMessage #{msg_id} deleted."),
                    Ok(false) => println!("\tMessage has not been deleted."),
                    Err(err) => report(&err),
                }
            } else {
                println!("\tMessage has not been deleted.");
            }
        }
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}

/// Edit one of the user's own messages
async fn edit_message_menu(db: &Db, login: &str, chat_id: i32) -> Result<()> {
    let title = "Edit a Message";
    print!("{}", render::menu_title(title));

    let line = prompt_line("\tSelect a message to edit")?;
    let Some(msg_id) = parse_choice(&line) else {
        println!("\tThat is not a message number.");
        print!("{}", render::end_rule(title));
        return Ok(());
    };

    match store::own_message_text(db, msg_id, chat_id, login).await {
        Ok(None) => println!(
            "\tError: You have either entered an invalid message # \
             or tried to edit another user's message."
        ),
        Ok(Some(old_body)) => {
            println!("\tOld message: {old_body}");
            let new_body = prompt_line("\tEnter a new message")?;

            match store::edit_message(db, msg_id, chat_id, login, &new_body).await {
                Ok(true) => println!("\tMessage #{msg_id} has been edited."),
                Ok(false) => println!("\tMessage could not be edited."),
                Err(err) => report(&err),
            }
        }
        Err(err) => report(&err),
    }

    print!("{}", render::end_rule(title));
    Ok(())
}
