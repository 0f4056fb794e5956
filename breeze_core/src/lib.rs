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

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod weather;

pub use weather::{StubWeatherService, WeatherService, extract_location};

/// Message role in the remote model's conversation format.
///
/// The generativelanguage API calls the assistant role `model`,
/// so we follow that naming on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One user-message/bot-reply exchange.
///
/// Turns are immutable once created and only ever appended to a
/// user's history, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub bot: String,
}

impl Turn {
    #[must_use]
    pub fn now(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            bot: bot.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse>;
    fn default_model(&self) -> &str;
}

/// Durable per-user turn history.
///
/// `load` treats a missing store or an unknown user as an empty history.
/// `save` overwrites the user's entire entry (last writer wins across
/// processes; there is no locking).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn load(&self, user_id: &str) -> anyhow::Result<Vec<Turn>>;
    async fn save(&self, user_id: &str, history: &[Turn]) -> anyhow::Result<()>;
}
