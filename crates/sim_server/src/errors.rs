use std::fmt;

/// Error when submitting a command to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The session has already finished.
    Finished,
    /// The session was stopped before the command arrived.
    Stopped,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Finished => write!(f, "session has finished"),
            SubmitError::Stopped => write!(f, "session was stopped"),
        }
    }
}

impl std::error::Error for SubmitError {}
