//! Run-level error type.

use crate::config::ConfigError;
use crate::mail::MailError;
use crate::sources::SourceError;

/// Fatal errors of a digest run
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Fetch failed for topic '{topic}' (keyword '{keyword}'): {source}")]
    Fetch {
        topic: String,
        keyword: String,
        #[source]
        source: SourceError,
    },

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("Failed to write artifacts: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize digest: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
