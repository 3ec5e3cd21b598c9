#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AabbError {
    #[error("Attempted to create an AABB which would have an invalid width or height")]
    AabbInvalidDims,
}

pub type Result<T, E = AabbError> = std::result::Result<T, E>;
