use thiserror::Error;

/// Errors that can occur while parsing or scaling a recipe
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No AI provider is configured, or the provider could not be reached in time
    #[error("AI service unavailable: {0}")]
    AiUnavailable(String),

    /// The AI response could not be read as JSON
    #[error("AI returned a malformed response: {0}")]
    AiMalformedResponse(String),

    /// The AI response was JSON but missed required recipe fields
    #[error("AI response does not describe a valid recipe: {0}")]
    AiSchemaInvalid(String),

    /// AI parsing was explicitly requested and failed, so no fallback was attempted
    #[error("AI parsing was forced and failed: {0}")]
    AiParsingForced(#[source] Box<PipelineError>),

    /// AI scaling was explicitly requested and failed, so no fallback was attempted
    #[error("AI scaling was forced and failed: {0}")]
    AiScalingForced(#[source] Box<PipelineError>),

    /// Multiplier, divisor, target or constraint reference is unusable
    #[error("Invalid scale request: {0}")]
    InvalidScaleRequest(String),

    /// Ingredients or instructions could not be normalized for scaling
    #[error("Recipe cannot be scaled: {0}")]
    InvalidRecipeForScaling(String),

    /// Provider construction failed (missing key, unknown provider name)
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl PipelineError {
    /// Whether the parser facade may fall back to the heuristic parser after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::AiUnavailable(_)
                | PipelineError::AiMalformedResponse(_)
                | PipelineError::AiSchemaInvalid(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Shortens an AI response for log output so prompt drift can be diagnosed
/// without dumping the whole payload.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(PipelineError::AiUnavailable("down".into()).is_recoverable());
        assert!(PipelineError::AiMalformedResponse("x".into()).is_recoverable());
        assert!(PipelineError::AiSchemaInvalid("x".into()).is_recoverable());
        assert!(!PipelineError::InvalidScaleRequest("x".into()).is_recoverable());
        let forced = PipelineError::AiParsingForced(Box::new(PipelineError::AiUnavailable(
            "down".into(),
        )));
        assert!(!forced.is_recoverable());
        assert!(forced.to_string().contains("down"));
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdefghij", 4), "abcd…");
    }
}
