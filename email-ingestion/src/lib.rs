pub mod alert;
pub mod digest;
pub mod email_ingester;
pub mod error;
pub mod senders;

pub use email_ingester::{EmailIngester, EmailIngesterConfig, ImapCredentials, RawMessage};
pub use error::{IngestError, Result};
pub use senders::{Publisher, SenderKind};
