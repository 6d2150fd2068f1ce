use terrain::TerrainError;
use thiserror::Error;

use crate::session::ViewerId;
use crate::terrain::generator::GenerationError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no viewer registered with id '{0}'")]
    ViewerNotFound(ViewerId),
    #[error("a viewer with id '{0}' is already registered")]
    DuplicateViewerRegistration(ViewerId),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
