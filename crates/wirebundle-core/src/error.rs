use crate::gauge::Gauge;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown connection type `{tag}` in {part}")]
    UnknownConnectionType { tag: String, part: String },

    #[error(
        "wire set `{tag}` in {part} does not match its connection type (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    WireSetMismatch {
        tag: String,
        part: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("no line width registered for gauge {gauge}")]
    UnregisteredGauge { gauge: Gauge },

    #[error("invalid gauge literal `{literal}` (expected an integer or `*`)")]
    InvalidGauge { literal: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid description {}: {message}", .path.display())]
    Description { path: PathBuf, message: String },
}

impl Error {
    /// Description data that is internally inconsistent, as opposed to a file that could not be
    /// read or parsed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownConnectionType { .. }
                | Error::WireSetMismatch { .. }
                | Error::UnregisteredGauge { .. }
                | Error::InvalidGauge { .. }
        )
    }
}
