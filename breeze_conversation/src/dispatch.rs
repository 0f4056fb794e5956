//! Per-turn routing between the weather fast-path and the model.

use breeze_core::{LLMProvider, WeatherService, extract_location};
use tracing::warn;

use crate::session::ChatSession;

/// Reply when the remote model fails for any reason. Raw error detail
/// goes to the log, never to the user.
pub const FALLBACK_REPLY: &str = "Oops! I couldn't process that. Could you please rephrase?";

/// Reply to a weather query with no extractable location.
pub const CLARIFY_LOCATION_PROMPT: &str = "Please specify a location to check the weather.";

/// Stateless per-turn responder selection.
///
/// Weather queries are answered locally through the [`WeatherService`]
/// seam; everything else is delegated to the session. Dispatch always
/// yields a reply string and never errors out.
pub struct TurnDispatcher<W> {
    weather: W,
}

impl<W: WeatherService> TurnDispatcher<W> {
    #[must_use]
    pub const fn new(weather: W) -> Self {
        Self { weather }
    }

    pub async fn dispatch<P: LLMProvider>(
        &self,
        input: &str,
        session: &mut ChatSession<P>,
    ) -> String {
        if input.to_lowercase().contains("weather") {
            return extract_location(input).map_or_else(
                || CLARIFY_LOCATION_PROMPT.to_string(),
                |location| {
                    let reading = self.weather.current_temperature(&location);
                    format!("The weather in {location} is {reading}°C.")
                },
            );
        }

        match session.send_message(input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed, falling back to canned reply: {e}");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
