use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};

/// Everything that can go wrong while converting an icon.
///
/// Each variant carries the path (and for I/O, the operation) that failed,
/// so a failure can be diagnosed without re-running the conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// None of the candidate names exists under any search root.
    #[error("icon source \"{candidates}\" not found")]
    SourceNotFound {
        /// All candidate names that were tried, joined by ", ".
        candidates: String,
    },

    /// The source image is smaller than the target format requires.
    #[error("image {path} must be at least {required}x{required} (was {actual})")]
    SizeTooSmall {
        /// The offending image.
        path: PathBuf,
        /// Minimum width and height required by the output format.
        required: u32,
        /// The largest usable dimension found in the image.
        actual: u32,
    },

    /// Reading, writing or inspecting a file failed.
    #[error("{context} {path}")]
    Io {
        /// What was being done when the error happened.
        context: &'static str,
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The file is not a valid image or icon container.
    #[error("cannot decode {path}")]
    Decode {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying decoder error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The requested output format is not one this crate can produce from
    /// the resolved source.
    #[error("unknown output format {format} for {path}")]
    UnsupportedFormat {
        /// The requested format.
        format: String,
        /// The resolved source.
        path: PathBuf,
    },

    /// A source directory holds no icon files.
    #[error("no icon files found in directory {path}")]
    EmptyIconSet {
        /// The directory that was searched.
        path: PathBuf,
    },
}

/// Result type used throughout the conversion pipeline.
pub type Result<T> = std::result::Result<T, ConversionError>;

impl ConversionError {
    pub(crate) fn decode<E>(path: &Path, source: E) -> ConversionError
        where E: Into<Box<dyn StdError + Send + Sync>>
    {
        ConversionError::Decode {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Attaches an operation and a path to I/O errors.
pub(crate) trait IoResultExt<T> {
    fn context(self, context: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn context(self, context: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| ConversionError::Io {
            context,
            path: path.to_path_buf(),
            source,
        })
    }
}
