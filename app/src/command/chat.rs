//! Conversation command: interactive loop or single-message mode.

use breeze_config::Config;
use breeze_conversation::{ConversationConfig, ConversationManager};
use breeze_core::StubWeatherService;
use breeze_providers::GeminiProvider;
use breeze_store::JsonStore;
use tracing::info;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Optional user id override
    pub user: Option<String>,
}

/// Strategy for executing the Chat command.
///
/// Wires configuration, the Gemini adapter, the JSON store and the
/// audit log into a [`ConversationManager`], then runs either a single
/// turn or the blocking console loop.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        info!("Loaded config from ~/breeze/config.json");

        let defaults = ConversationConfig::default();
        let conversation_config = ConversationConfig {
            user_id: input
                .user
                .unwrap_or_else(|| config.agents.defaults.user_id.clone()),
            model: input
                .model
                .unwrap_or_else(|| config.agents.defaults.model.clone()),
            system_prompt: config
                .agents
                .defaults
                .system_prompt
                .clone()
                .unwrap_or(defaults.system_prompt),
            log_path: config.log_path()?,
        };

        let provider = GeminiProvider::new(config.providers.gemini.api_key.clone());
        let store = JsonStore::new(config.memory_path()?);

        info!(
            "Starting conversation for user {} (model: {})",
            conversation_config.user_id, conversation_config.model
        );

        let mut manager = ConversationManager::new(
            provider,
            StubWeatherService,
            store,
            conversation_config,
        )
        .await?;

        if let Some(msg) = input.message {
            // Single message mode
            let result = manager.process_turn(&msg).await?;
            println!("Bot: {}", result.reply);
            manager.shutdown().await?;
            info!("Turn {} completed.", result.turn_number);
        } else {
            // Interactive mode
            manager.run_interactive().await?;
            info!("Conversation ended: {} total turn(s)", manager.history().len());
        }

        Ok(())
    }
}
