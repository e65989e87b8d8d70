use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChurnError {
    #[error("invalid {field} value '{value}' (expected one of: {})", allowed.join(", "))]
    InvalidCategory {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{field} value {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("prediction failed: {message}")]
    PredictionFailure { message: String },
}

impl ChurnError {
    pub fn invalid_category<I>(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::InvalidCategory {
            field: field.into(),
            value: value.into(),
            allowed: allowed
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        }
    }

    pub fn prediction_failure(message: impl Into<String>) -> Self {
        Self::PredictionFailure {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the artifacts.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidCategory { .. } | Self::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;
