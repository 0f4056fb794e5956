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

//! The conversation turn-processing pipeline.
//!
//! A turn flows through three stages:
//! - [`TurnDispatcher`]: weather fast-path or delegation to the model,
//!   with the single failure-to-apology fallback.
//! - [`ChatSession`]: the remote model's conversational context,
//!   bootstrapped once from persisted history.
//! - [`ConversationManager`]: the interactive loop, the audit log, and
//!   persistence of the full history at shutdown.

mod dispatch;
mod manager;
mod session;

pub use dispatch::{CLARIFY_LOCATION_PROMPT, FALLBACK_REPLY, TurnDispatcher};
pub use manager::{ConversationConfig, ConversationError, ConversationManager, TurnResult};
pub use session::ChatSession;
