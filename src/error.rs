use std::path::PathBuf;

/// Faults raised by the repository layer.
///
/// Batch enumeration swallows `InvalidFilename` (a file that is not a
/// publishable item is simply omitted); every other variant propagates to
/// whichever accessor triggered the underlying read or parse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to extract date or permalink from {path:?}")]
    InvalidFilename { path: PathBuf },

    #[error("malformed metadata block in {path:?}: {reason}")]
    MalformedMetadata { path: PathBuf, reason: String },

    #[error("failed to format content: {0}")]
    Formatting(String),

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Error::MalformedMetadata {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
