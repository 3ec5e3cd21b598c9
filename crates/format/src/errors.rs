#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("Not a canvas file: magic was {0:#010x}")]
    BadMagic(u32),

    #[error("Unsupported canvas file version {0}")]
    UnsupportedVersion(u32),

    #[error("File ended before the header was complete")]
    TruncatedHeader,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FormatError> = std::result::Result<T, E>;
