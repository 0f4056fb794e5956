//! Location extraction and the pluggable weather lookup seam.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"in ([A-Za-z\s]+)").expect("location pattern is valid")
});

/// Extract a location phrase from free-form text.
///
/// Scans for `in <words>` on the original-case input and returns the
/// trimmed span after the token, e.g. "What's the weather in Paris?"
/// yields `Paris`. No match is a normal outcome, not an error.
#[must_use]
pub fn extract_location(input: &str) -> Option<String> {
    LOCATION_PATTERN
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|loc| !loc.is_empty())
}

/// Weather lookup capability.
///
/// The dispatcher depends only on this trait so a real provider can be
/// substituted without touching dispatch logic.
pub trait WeatherService: Send + Sync {
    /// Current temperature in °C for the given location.
    fn current_temperature(&self, location: &str) -> i32;
}

/// Placeholder weather source returning a fixed reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubWeatherService;

impl WeatherService for StubWeatherService {
    fn current_temperature(&self, _location: &str) -> i32 {
        25
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_location_after_in_token() {
        assert_eq!(
            extract_location("What's the weather in Paris?"),
            Some("Paris".to_string())
        );
    }

    #[test]
    fn extracts_multi_word_location() {
        assert_eq!(
            extract_location("weather in New York today?"),
            Some("New York today".to_string())
        );
    }

    #[test]
    fn no_location_returns_none() {
        assert_eq!(extract_location("How is the weather?"), None);
    }

    #[test]
    fn extraction_preserves_original_case() {
        assert_eq!(
            extract_location("weather in Tokyo"),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn stub_reading_is_constant() {
        let stub = StubWeatherService;
        assert_eq!(stub.current_temperature("Paris"), 25);
        assert_eq!(stub.current_temperature("Ushuaia"), 25);
        assert_eq!(stub.current_temperature(""), 25);
    }
}
