/// Convenience result type used across Daybreak.
pub type DaybreakResult<T> = Result<T, DaybreakError>;

/// Top-level error taxonomy used by the job pipeline.
#[derive(thiserror::Error, Debug)]
pub enum DaybreakError {
    /// Invalid or missing settings.
    #[error("config error: {0}")]
    Config(String),

    /// Network, HTTP status or payload failure from a quote or photo provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Font resolution or text measurement failure.
    #[error("layout error: {0}")]
    Layout(String),

    /// Canvas cannot be composited (zero-size, undecodable, too large).
    #[error("composition error: {0}")]
    Composition(String),

    /// Messaging channel rejected or failed to receive the card.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Artifact removal failure. Always swallowed by the orchestrator.
    #[error("cleanup error: {0}")]
    Cleanup(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DaybreakError {
    /// Build a [`DaybreakError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DaybreakError::Provider`] value.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Build a [`DaybreakError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`DaybreakError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`DaybreakError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`DaybreakError::Cleanup`] value.
    pub fn cleanup(msg: impl Into<String>) -> Self {
        Self::Cleanup(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
