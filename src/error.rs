use thiserror::Error;

/// Process-level failure: a message for stderr plus the exit code to return.
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

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Why a single deal could not be evaluated.
///
/// Errors are local to one deal; a batch reports them per row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("division by zero computing {what}")]
    DivisionByZero { what: String },

    #[error("result is not a finite number: {what}")]
    Overflow { what: String },
}

impl EvalError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EvalError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
