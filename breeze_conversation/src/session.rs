//! The remote model's conversational context.

use breeze_core::{ChatMessage, LLMProvider, Role, Turn};
use tracing::debug;

/// An ongoing exchange with the remote model.
///
/// The session holds the full ordered message context sent with every
/// request: one leading system message, then the reconstructed
/// user/model pairs, then whatever has been exchanged since. It is
/// built once at startup and is not rebuildable mid-run.
pub struct ChatSession<P> {
    provider: P,
    model: String,
    messages: Vec<ChatMessage>,
}

impl<P: LLMProvider> ChatSession<P> {
    /// Reconstruct a session from persisted history.
    ///
    /// Emits, for each turn in order, a user message followed by a
    /// model message, with the fixed system prompt prepended.
    pub fn bootstrap(provider: P, model: String, system_prompt: &str, history: &[Turn]) -> Self {
        let mut messages = Vec::with_capacity(history.len() * 2 + 1);
        messages.push(ChatMessage::new(Role::System, system_prompt));
        for turn in history {
            messages.push(ChatMessage::new(Role::User, turn.user.clone()));
            messages.push(ChatMessage::new(Role::Model, turn.bot.clone()));
        }
        debug!(
            "Bootstrapped session with {} message(s) from {} turn(s)",
            messages.len(),
            history.len()
        );
        Self {
            provider,
            model,
            messages,
        }
    }

    /// Send one message and return the model's reply text.
    ///
    /// On success both the user message and the reply join the session
    /// context; on failure the context is left unchanged so a retried
    /// turn does not see a dangling user message.
    pub async fn send_message(&mut self, text: &str) -> anyhow::Result<String> {
        let mut request = self.messages.clone();
        request.push(ChatMessage::new(Role::User, text));

        let response = self.provider.chat(&request, &self.model).await?;

        if response.content.trim().is_empty() {
            anyhow::bail!("empty response from model");
        }

        if let Some(usage) = &response.usage {
            debug!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        self.messages.push(ChatMessage::new(Role::User, text));
        self.messages
            .push(ChatMessage::new(Role::Model, response.content.clone()));

        Ok(response.content)
    }

    /// Number of messages in the session context, system prompt included.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use breeze_core::LLMResponse;

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            _model: &str,
        ) -> anyhow::Result<LLMResponse> {
            let last = messages
                .last()
                .ok_or_else(|| anyhow::anyhow!("no messages"))?;
            Ok(LLMResponse {
                content: format!("echo: {}", last.content),
                usage: None,
            })
        }

        fn default_model(&self) -> &str {
            "echo"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _model: &str,
        ) -> anyhow::Result<LLMResponse> {
            anyhow::bail!("quota exceeded")
        }

        fn default_model(&self) -> &str {
            "failing"
        }
    }

    fn sample_history() -> Vec<Turn> {
        vec![
            Turn::now("first question", "first answer"),
            Turn::now("second question", "second answer"),
        ]
    }

    #[test]
    fn bootstrap_interleaves_history_after_system_prompt() {
        let session = ChatSession::bootstrap(
            EchoProvider,
            "echo".to_string(),
            "Be helpful.",
            &sample_history(),
        );

        let messages = session.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "first question");
        assert_eq!(messages[2].role, Role::Model);
        assert_eq!(messages[2].content, "first answer");
        assert_eq!(messages[4].content, "second answer");
    }

    #[tokio::test]
    async fn send_message_extends_context_on_success() {
        let mut session =
            ChatSession::bootstrap(EchoProvider, "echo".to_string(), "Be helpful.", &[]);

        let reply = session.send_message("hello").await.unwrap();

        assert_eq!(reply, "echo: hello");
        assert_eq!(session.message_count(), 3);
    }

    #[tokio::test]
    async fn failed_send_leaves_context_unchanged() {
        let mut session =
            ChatSession::bootstrap(FailingProvider, "failing".to_string(), "Be helpful.", &[]);

        assert!(session.send_message("hello").await.is_err());
        assert_eq!(session.message_count(), 1);
    }
}
