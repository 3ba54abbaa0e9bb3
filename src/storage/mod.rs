//! Watermark persistence over SQLite.
//!
//! One row per (chat, feed URL) pair holds the publish time of the newest
//! item already delivered to that chat from that feed. The pool behind
//! [`Database`] is created once in `main` and passed down.

mod schema;
mod watermarks;

pub use schema::Database;
