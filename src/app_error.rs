use std::fmt::Display;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RekognitionError {
    #[error("Transient failure: {0}")]
    Transient(String),
    #[error("Request rejected ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("Model version {version_name} failed to start: {message}")]
    StartFailed {
        version_name: String,
        message: String,
    },
    #[error("Model version {version_name} not running after {attempts} attempts ({waited:?})")]
    Timeout {
        version_name: String,
        attempts: u32,
        waited: Duration,
    },
}

impl RekognitionError {
    pub fn rejected(code: impl ToString, message: impl ToString) -> Self {
        Self::Rejected {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RekognitionError::Transient(_) => ErrorKind::Transient,
            RekognitionError::Rejected { .. } | RekognitionError::StartFailed { .. } => {
                ErrorKind::Permanent
            }
            RekognitionError::Timeout { .. } => ErrorKind::Timeout,
        }
    }
}

/// How a caller should react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network trouble or throttling, the same call may succeed later.
    Transient,
    Permanent,
    /// The waiter gave up; the model may still reach the running state.
    Timeout,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Permanent => 1,
            ErrorKind::Transient => 75,
            ErrorKind::Timeout => 124,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Wait,
    Describe,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Stage::Start => "start",
            Stage::Wait => "wait",
            Stage::Describe => "describe",
        };
        write!(f, "{}", str)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{stage} failed: {source}")]
pub struct StartModelError {
    pub stage: Stage,
    pub source: RekognitionError,
}

impl StartModelError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl From<&StartModelError> for ExitCode {
    fn from(error: &StartModelError) -> Self {
        ExitCode::from(error.kind().exit_code())
    }
}
