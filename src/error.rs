//! Error types.
//!
//! `AppError` is what the binary reports: a message plus the process exit code.
//! The pipeline stages use typed errors that convert into it.
//!
//! Exit codes:
//! - `2`: input/config problems (unreadable file, unrecognized export, bad env)
//! - `4`: database failures

use thiserror::Error;

#[derive(Clone)]
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

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
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

impl std::error::Error for AppError {}

/// Fatal normalization failures. Row-level problems never surface here; they
/// degrade to missing values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("No data header found (expected a line starting with DATE, YEAR, YYYYMMDD or LOCAL_DATE).")]
    MissingHeader,

    #[error("Could not build the date: {reason}. Columns: {}", columns.join(", "))]
    DateReconstruction { reason: String, columns: Vec<String> },

    #[error("Missing T2M/RH2M. Columns: {}", available.join(", "))]
    MissingColumns { available: Vec<String> },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to start database runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Failed to connect to Postgres at {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database query failed ({context}): {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::new(4, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_available_names() {
        let err = NormalizeError::MissingColumns {
            available: vec!["YEAR".to_string(), "DOY".to_string(), "T2M".to_string()],
        };
        assert_eq!(err.to_string(), "Missing T2M/RH2M. Columns: YEAR, DOY, T2M");
    }

    #[test]
    fn normalize_errors_exit_with_input_code() {
        let app: AppError = NormalizeError::MissingHeader.into();
        assert_eq!(app.exit_code(), 2);
        assert!(app.to_string().starts_with("No data header found"));
    }
}
