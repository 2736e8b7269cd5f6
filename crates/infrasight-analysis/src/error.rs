use infrasight_common::types::Channel;

/// Errors raised while turning sensor rows into predictions.
///
/// # Examples
///
/// ```rust
/// use infrasight_analysis::error::AnalysisError;
/// use infrasight_common::types::Channel;
///
/// let err = AnalysisError::InsufficientData { channel: Channel::Pressure };
/// assert!(err.to_string().contains("pressure"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The observation sequence for a channel is empty, so no line can be fit.
    #[error("Analysis: no observations for channel '{channel}'")]
    InsufficientData { channel: Channel },

    /// An observation is NaN or infinite.
    #[error("Analysis: non-finite observation for channel '{channel}' at index {index}")]
    NonFiniteObservation { channel: Channel, index: usize },

    /// The fitted line overflowed, e.g. readings close to `f64::MAX`.
    #[error("Analysis: prediction for channel '{channel}' is not finite")]
    NonFinitePrediction { channel: Channel },
}

/// Convenience `Result` alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
