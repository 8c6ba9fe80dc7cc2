// Error type for decoding and encoding persisted clay data.
// Geometry generation and replay are total and never return errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClayError {
    /// Stored JSON is malformed, has missing fields or wrong types.
    #[error("failed to decode clay data: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode clay data: {0}")]
    Encode(#[source] serde_json::Error),

    /// A decoded action carries NaN or an infinity.
    #[error("deform action {index} has a non-finite {field}")]
    NonFiniteValue { index: usize, field: &'static str },

    /// A live gesture quantized to NaN or an infinity and was not recorded.
    #[error("stroke has a non-finite {field}")]
    NonFiniteStroke { field: &'static str },

    /// Stored generation parameters carry NaN or an infinity.
    #[error("shape parameter {field} is not finite")]
    NonFiniteParam { field: &'static str },

    /// Stored sphere detail exceeds what generation supports.
    #[error("shape detail {detail} exceeds the maximum of {max}")]
    DetailOutOfRange { detail: u32, max: u32 },

    /// Strict shape parsing rejected a keyword outside the known set.
    #[error("unknown shape keyword: {0:?}")]
    UnknownShape(String),

    /// Replaying the stored log did not reproduce the expected geometry.
    #[error("replayed mesh differs from the live mesh at vertex {vertex}")]
    ReplayMismatch { vertex: usize },

    /// The live mesh holds a NaN or infinite position and cannot be saved.
    #[error("mesh vertex {vertex} is not finite")]
    NonFiniteGeometry { vertex: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClayError>;
