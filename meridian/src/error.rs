//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeridianError {
    /// Malformed WKT-CS text. Parsing stops at the first error, no partial result is produced.
    #[error("invalid WKT at position {position}: {message}")]
    WktParse {
        /// Byte offset in the source text where the error was detected.
        position: usize,
        /// Description of the problem.
        message: String,
    },
    /// WKT text was valid but its root node does not describe a coordinate system.
    #[error("not a coordinate system: {0}")]
    NotCoordinateSystem(String),
    /// Malformed `BBOX` text.
    #[error("invalid bounding box text: {0}")]
    BoundingBoxParse(String),
    /// A coordinate operation could not transform a coordinate.
    #[error("coordinate operation failed: {0}")]
    Operation(String),
    /// Coordinate system id is not known to the lookup.
    #[error("unknown coordinate system id: {0}")]
    UnknownCoordinateSystem(i32),
}

impl MeridianError {
    pub(crate) fn wkt(position: usize, message: impl Into<String>) -> Self {
        Self::WktParse {
            position,
            message: message.into(),
        }
    }
}
