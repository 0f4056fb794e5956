//! Interactive conversation loop with persistence.

use breeze_core::{ConversationStore, LLMProvider, Turn, WeatherService};
use breeze_store::TurnLog;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::dispatch::TurnDispatcher;
use crate::session::ChatSession;

/// Configuration for a conversation run.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// User whose history is loaded and saved
    pub user_id: String,
    /// Model to use for completions
    pub model: String,
    /// System prompt prepended at bootstrap
    pub system_prompt: String,
    /// Append-only audit log file
    pub log_path: PathBuf,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            user_id: "user123".to_string(),
            model: "gemini-2.0-flash".to_string(),
            system_prompt: "You are a friendly and witty customer support assistant. \
                            Always greet the user by name, and crack light jokes occasionally."
                .to_string(),
            log_path: PathBuf::from("chat_log.txt"),
        }
    }
}

/// Errors that can occur during conversation management.
///
/// Remote-model failures never surface here; the dispatcher absorbs
/// them into a canned reply. What remains is storage and console I/O.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Conversation store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Turn log error: {0}")]
    Log(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of processing a single turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// The bot's reply
    pub reply: String,
    /// 1-based turn number within the full history
    pub turn_number: usize,
}

/// Owns one user's conversation from startup to shutdown.
///
/// On construction the persisted history is loaded and the model
/// session bootstrapped from it. Turns accumulate in memory and in the
/// audit log as they happen; the durable store is rewritten once, at
/// shutdown. A crash before shutdown loses the in-memory turns except
/// what already reached the log.
pub struct ConversationManager<P, W, S> {
    config: ConversationConfig,
    dispatcher: TurnDispatcher<W>,
    session: ChatSession<P>,
    store: S,
    log: TurnLog,
    history: Vec<Turn>,
}

impl<P, W, S> ConversationManager<P, W, S>
where
    P: LLMProvider,
    W: WeatherService,
    S: ConversationStore,
{
    /// Load the user's history and bootstrap the model session.
    pub async fn new(
        provider: P,
        weather: W,
        store: S,
        config: ConversationConfig,
    ) -> Result<Self, ConversationError> {
        let history = store
            .load(&config.user_id)
            .await
            .map_err(ConversationError::Store)?;

        if history.is_empty() {
            info!("Starting a new conversation for user {}", config.user_id);
        } else {
            info!(
                "Loaded {} previous turn(s) for user {}",
                history.len(),
                config.user_id
            );
        }

        let session = ChatSession::bootstrap(
            provider,
            config.model.clone(),
            &config.system_prompt,
            &history,
        );
        let log = TurnLog::new(config.log_path.clone());

        Ok(Self {
            config,
            dispatcher: TurnDispatcher::new(weather),
            session,
            store,
            log,
            history,
        })
    }

    /// Process one user input into a reply, recording the turn in
    /// memory and in the audit log.
    pub async fn process_turn(&mut self, input: &str) -> Result<TurnResult, ConversationError> {
        let reply = self.dispatcher.dispatch(input, &mut self.session).await;

        self.log
            .record(input, &reply, &mut self.history)
            .map_err(ConversationError::Log)?;

        debug!("Turn {} completed", self.history.len());

        Ok(TurnResult {
            reply,
            turn_number: self.history.len(),
        })
    }

    /// Run the blocking console loop until `exit` or end of input,
    /// then persist the full history.
    pub async fn run_interactive(&mut self) -> Result<(), ConversationError> {
        println!("Welcome to the chatbot! Type 'exit' to quit.");

        loop {
            print!("You: ");
            std::io::stdout().flush()?;

            let mut line = String::new();
            let bytes = std::io::stdin().read_line(&mut line)?;
            if bytes == 0 {
                // EOF behaves like exit, minus the goodbye.
                break;
            }
            let input = line.trim();

            if input.eq_ignore_ascii_case("exit") {
                println!("Bot: Goodbye!");
                break;
            }

            if input.is_empty() {
                continue;
            }

            let result = self.process_turn(input).await?;
            println!("Bot: {}", result.reply);
        }

        self.shutdown().await
    }

    /// Overwrite the user's durable history with the in-memory state.
    pub async fn shutdown(&self) -> Result<(), ConversationError> {
        self.store
            .save(&self.config.user_id, &self.history)
            .await
            .map_err(ConversationError::Store)?;

        info!(
            "Saved {} turn(s) for user {}",
            self.history.len(),
            self.config.user_id
        );
        Ok(())
    }

    /// In-memory turn history for this run, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The model session backing this conversation.
    #[must_use]
    pub const fn session(&self) -> &ChatSession<P> {
        &self.session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use breeze_core::{ChatMessage, LLMResponse, StubWeatherService};
    use breeze_store::JsonStore;

    struct CannedProvider(&'static str);

    #[async_trait]
    impl LLMProvider for CannedProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
        ) -> anyhow::Result<LLMResponse> {
            Ok(LLMResponse {
                content: self.0.to_string(),
                usage: None,
            })
        }

        fn default_model(&self) -> &str {
            "canned"
        }
    }

    fn config_in(dir: &std::path::Path) -> ConversationConfig {
        ConversationConfig {
            user_id: "user123".to_string(),
            log_path: dir.join("chat_log.txt"),
            ..ConversationConfig::default()
        }
    }

    #[tokio::test]
    async fn weather_turn_persists_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("chat_memory.json"));

        let mut manager = ConversationManager::new(
            CannedProvider("unused"),
            StubWeatherService,
            store,
            config_in(dir.path()),
        )
        .await
        .unwrap();

        let result = manager.process_turn("weather in Tokyo").await.unwrap();
        assert_eq!(result.reply, "The weather in Tokyo is 25°C.");
        assert_eq!(result.turn_number, 1);

        manager.shutdown().await.unwrap();

        let store = JsonStore::new(dir.path().join("chat_memory.json"));
        let saved = store.load("user123").await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].user, "weather in Tokyo");
        assert_eq!(saved[0].bot, "The weather in Tokyo is 25°C.");
    }

    #[tokio::test]
    async fn resumed_session_sees_saved_turns() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = JsonStore::new(dir.path().join("chat_memory.json"));
            let mut manager = ConversationManager::new(
                CannedProvider("nice to meet you"),
                StubWeatherService,
                store,
                config_in(dir.path()),
            )
            .await
            .unwrap();

            manager.process_turn("hello there").await.unwrap();
            manager.shutdown().await.unwrap();
        }

        let store = JsonStore::new(dir.path().join("chat_memory.json"));
        let manager = ConversationManager::new(
            CannedProvider("unused"),
            StubWeatherService,
            store,
            config_in(dir.path()),
        )
        .await
        .unwrap();

        assert_eq!(manager.history().len(), 1);
        // System prompt + one reconstructed user/model pair.
        assert_eq!(manager.session().message_count(), 3);
    }

    #[tokio::test]
    async fn turns_accumulate_in_audit_log() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("chat_memory.json"));

        let mut manager = ConversationManager::new(
            CannedProvider("sure"),
            StubWeatherService,
            store,
            config_in(dir.path()),
        )
        .await
        .unwrap();

        manager.process_turn("first").await.unwrap();
        manager.process_turn("weather in Oslo").await.unwrap();

        let log = std::fs::read_to_string(dir.path().join("chat_log.txt")).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("User: first | Bot: sure"));
        assert!(lines[1].contains("User: weather in Oslo | Bot: The weather in Oslo is 25°C."));
    }
}
