//! chitter - Console Messenger Client
//!
//! chitter is a menu-driven console front-end for a messaging application
//! backed by a `PostgreSQL` database. It connects once at startup,
//! authenticates a user, and exposes contacts, block lists, chats, and
//! messages as menu actions over a thin query-execution layer.
//!
//! # Core Principles
//! - One database connection for the process lifetime; fail fast if it
//!   cannot be established
//! - All SQL parameterized; no statement assembled from raw console input
//! - Multi-statement sequences run in explicit transactions
//! - The authenticated session is a value threaded through the menu
//!   controller, never shared mutable state
//! - Strictly single-threaded and single-session; not designed for
//!   concurrent users
//!
//! # Module Organization
//! - [`error`] - Error types and classification
//! - [`config`] - CLI arguments and the stored connection profile
//! - [`db`] - Connection manager and query executor
//! - [`store`] - Data operations against the messenger schema
//! - [`session`] - Menu state machine and interactive driver
//! - [`render`] - Console presentation (menus, tables, chat bubbles)

pub mod config;
pub mod db;
pub mod error;
pub mod render;
pub mod session;
pub mod store;

// Re-export commonly used types for convenience
pub use config::{Cli, ConnectionProfile};
pub use db::{ConnectionParams, Db};
pub use error::{ChitterError, Result};
pub use session::{Event, Login, MenuState};
pub use store::{ChatSummary, ListKind, MessageRow};
