use thiserror::Error;

/// Failures surfaced by the resolver and the normalizer.
///
/// Configuration problems are not part of this enum; the config layer
/// reports those through `anyhow` with hints for the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// Geocoding returned zero candidates for a name-based lookup.
    #[error("City not found: {0}")]
    NotFound(String),

    /// Transport failure or non-success HTTP status from either endpoint.
    #[error("Upstream request failed: {message}")]
    Upstream { message: String, status: Option<u16> },

    /// The upstream answered 2xx but the payload had an unexpected shape.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream { message: message.into(), status: None }
    }

    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream { message: message.into(), status: Some(status) }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}
