use thiserror::Error;

/// Error surfaced by the `survey` binary: a message plus the process exit code.
///
/// Exit codes:
/// - `2` input or usage problems (missing file/column, unparsable field)
/// - `3` data problems (insufficient observations, empty result)
/// - `4` internal, render or terminal failures
#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

/// Failures of the summary, analytics and chart functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    #[error("Series {currency}/{term} has {count} observation(s); at least 2 are required.")]
    InsufficientObservations {
        currency: String,
        term: String,
        count: usize,
    },

    #[error("Series {currency}/{term} spans zero days (all observations on {date}).")]
    ZeroSpan {
        currency: String,
        term: String,
        date: chrono::NaiveDate,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),
}

impl From<SurveyError> for AppError {
    fn from(err: SurveyError) -> Self {
        let exit_code = match err {
            SurveyError::InvalidArgument(_) => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_errors_map_to_exit_codes() {
        let err: AppError = SurveyError::InvalidArgument("window must be > 0".to_string()).into();
        assert_eq!(err.exit_code(), 2);

        let err: AppError = SurveyError::InsufficientObservations {
            currency: "EUR".to_string(),
            term: "1Y".to_string(),
            count: 1,
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("EUR/1Y"));
    }
}
