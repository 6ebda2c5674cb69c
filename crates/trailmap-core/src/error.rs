//! Error types for the calculators and dashboard assembly.
//!
//! Invalid input is reported instead of being clamped or replaced with zero,
//! so a caller bug shows up at the call site.

use thiserror::Error;

/// Errors returned by the progress, layout and ranking calculators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// An argument was outside the range the calculation accepts.
    #[error("invalid argument `{argument}`: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
}

impl ComputeError {
    pub(crate) fn invalid(argument: &'static str, message: impl Into<String>) -> Self {
        ComputeError::InvalidArgument {
            argument,
            message: message.into(),
        }
    }

    /// Name of the offending argument.
    pub fn argument(&self) -> &'static str {
        match self {
            ComputeError::InvalidArgument { argument, .. } => argument,
        }
    }
}

/// Errors raised while assembling a dashboard from a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("unknown learner: {0}")]
    UnknownLearner(String),

    #[error("unknown course: {0}")]
    UnknownCourse(String),

    #[error(transparent)]
    Compute(#[from] ComputeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_names_argument() {
        let err = ComputeError::invalid("total", "must be >= 0, got -1");
        assert_eq!(err.argument(), "total");
        assert_eq!(
            err.to_string(),
            "invalid argument `total`: must be >= 0, got -1"
        );
    }

    #[test]
    fn dataset_error_wraps_compute_error() {
        let err: DatasetError = ComputeError::invalid("order", "out of range").into();
        assert!(matches!(err, DatasetError::Compute(_)));
        assert!(err.to_string().contains("order"));
    }
}
