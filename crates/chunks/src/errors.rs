#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("chunk_size must be at least 1")]
    ZeroChunkSize,

    #[error("chunk_size {0} is larger than the maximum of {max}", max = crate::MAX_CHUNK_SIZE)]
    ChunkSizeTooLarge(u32),

    #[error("pool_radius {0} is larger than the maximum of {max}", max = crate::MAX_POOL_RADIUS)]
    PoolRadiusTooLarge(u32),

    #[error("max_cached_chunks must be at least 1")]
    ZeroCacheCapacity,

    #[error("max_undo_actions must be at least 1")]
    ZeroUndoDepth,

    #[error("Could not parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Canvas file error: {0}")]
    Format(#[from] canvas_format::FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Bitmap has {actual} bytes but a chunk of size {chunk_size} needs {expected}")]
    ChunkSizeMismatch {
        chunk_size: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
