use thiserror::Error;

use crate::coords::Coords;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("{field} = {value} does not fit its encoded width (max {max})")]
    RangeFieldOverflow {
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("unknown surface shape {0}")]
    UnknownSurfaceShape(u8),
    #[error("malformed encoded chunk '{}': {reason}", .key.as_deref().unwrap_or("?"))]
    MalformedEncodedChunk {
        key: Option<String>,
        reason: String,
    },
    #[error("cell {0} lies outside the chunk")]
    CellOutsideChunk(Coords),
    #[error("invalid chunk key '{0}'")]
    InvalidChunkKey(String),
    #[error("message serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TerrainError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEncodedChunk {
            key: None,
            reason: reason.into(),
        }
    }

    /// Attaches the chunk key to a malformed-chunk error; other variants pass through.
    pub(crate) fn for_key(self, chunk_key: &str) -> Self {
        match self {
            Self::MalformedEncodedChunk { reason, .. } => Self::MalformedEncodedChunk {
                key: Some(chunk_key.to_string()),
                reason,
            },
            other => other,
        }
    }
}
