use std::path::PathBuf;
use wirebundle_core::Gauge;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] wirebundle_core::Error),

    #[error("wire set `{tag}` of main part {main_part} has no matching socket")]
    UnmatchedWireSet { tag: String, main_part: String },

    #[error(
        "gauge conflict on `{tag}`: {main_part} uses {main_gauge}, {socket_part} uses {socket_gauge}"
    )]
    GaugeConflict {
        tag: String,
        main_part: String,
        socket_part: String,
        main_gauge: Gauge,
        socket_gauge: Gauge,
    },

    #[error("failed to read drawing {}: {source}", .path.display())]
    DrawingIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid SVG in {drawing}: {message}")]
    Xml { drawing: String, message: String },

    #[error("drawing {drawing} has no usable {dimension}")]
    MissingDimension {
        drawing: String,
        dimension: &'static str,
    },

    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Inconsistent description data: the assembly cannot be laid out as described.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::UnmatchedWireSet { .. } | Error::GaugeConflict { .. } => true,
            Error::Core(e) => e.is_configuration_error(),
            _ => false,
        }
    }
}
