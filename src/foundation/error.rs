/// Convenience result type used across irisgate.
pub type IrisgateResult<T> = Result<T, IrisgateError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum IrisgateError {
    /// Invalid user-provided or session configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or sampling animation curves.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while evaluating phase or scene state for a tick.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors while rasterizing or emitting a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IrisgateError {
    /// Build a [`IrisgateError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`IrisgateError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`IrisgateError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`IrisgateError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
