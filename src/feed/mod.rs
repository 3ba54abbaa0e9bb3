//! Feed retrieval and parsing.
//!
//! - [`parser`] turns RSS/Atom XML into [`FeedItem`]s via the `feed-rs`
//!   crate, preserving document order (feeds are conventionally
//!   newest-first).
//! - [`fetcher`] retrieves the XML over HTTP with a timeout and a
//!   response size cap.

mod fetcher;
mod parser;

pub use fetcher::{fetch_feed, FetchError};
pub use parser::{parse_feed, FeedItem};
