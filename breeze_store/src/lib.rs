#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! File-backed conversation persistence.
//!
//! Two separate durable artifacts exist side by side:
//! - [`JsonStore`]: a single JSON document mapping user id to turn
//!   history, rewritten wholesale on save.
//! - [`TurnLog`]: an append-only, human-readable audit log with one
//!   line per turn, never truncated.
//!
//! The two are intentionally not transactional with each other.

mod log;
mod store;

pub use log::TurnLog;
pub use store::{ConversationRecord, JsonStore};
