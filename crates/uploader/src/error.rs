//! Pipeline error types.

use crate::notice::Messages;

/// Errors that reject a whole intake before anything is staged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("too many files: {attempted} exceeds the limit of {limit}")]
    TooManyFiles { limit: usize, attempted: usize },

    #[error("single-file mode already holds a file")]
    SingleFileOccupied,
}

/// Failure of a single file transfer.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Server refused the file with a message meant for the user.
    #[error("{message}")]
    Forbidden { message: String },

    #[error("rejected by server ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Text shown to the user when this transfer fails.
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            Self::Forbidden { message } => message.clone(),
            _ => messages.upload_failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_uses_server_message() {
        let err = TransferError::Forbidden {
            message: "quota exceeded".into(),
        };
        assert_eq!(err.user_message(&Messages::default()), "quota exceeded");
    }

    #[test]
    fn other_failures_use_generic_message() {
        let messages = Messages::default();
        let err = TransferError::Network("connection reset".into());
        assert_eq!(err.user_message(&messages), messages.upload_failed);

        let err = TransferError::Rejected {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.user_message(&messages), messages.upload_failed);
    }
}
