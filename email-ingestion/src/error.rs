#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid mailbox URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Could not connect to {server}: {reason}")]
    Connect { server: String, reason: String },

    #[error("TLS negotiation with {server} failed: {reason}")]
    Tls { server: String, reason: String },

    #[error("Login failed for {user}: {reason}")]
    Login { user: String, reason: String },

    #[error("Cannot open mailbox {mailbox}: {reason}")]
    Mailbox { mailbox: String, reason: String },

    #[error("IMAP error: {0}")]
    Imap(#[from] imap::Error),

    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}

impl IngestError {
    /// True when the whole mailbox is out of reach, as opposed to one message.
    pub fn is_mailbox_unavailable(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidUri { .. }
                | IngestError::Connect { .. }
                | IngestError::Tls { .. }
                | IngestError::Login { .. }
                | IngestError::Mailbox { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
