use terrain::TerrainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unexpected '{0}' message from the server")]
    UnexpectedMessage(&'static str),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
