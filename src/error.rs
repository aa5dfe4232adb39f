//! Error types and handling for SquarePad

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for SquarePad operations
pub type Result<T> = std::result::Result<T, SquarePadError>;

/// Main error type for SquarePad operations
#[derive(Debug, Error)]
pub enum SquarePadError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image decode, resize or encode errors
    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Source directory enumeration errors
    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid letterbox parameters
    #[error("Invalid parameters: {message}")]
    InvalidParameters { message: String },

    /// A single file could not be processed
    #[error("File processing failed: {message} (file: {file:?})")]
    FileError {
        message: String,
        file: Option<PathBuf>,
        #[source]
        source: Option<Box<SquarePadError>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

impl SquarePadError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new invalid parameters error
    pub fn invalid_parameters<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameters {
            message: message.into(),
        }
    }

    /// Create a new per-file error
    pub fn file<S: Into<String>>(message: S, file: Option<PathBuf>) -> Self {
        Self::FileError {
            message: message.into(),
            file,
            source: None,
        }
    }

    /// Get the associated file path if available
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileError { file, .. } => file.as_ref(),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("File system error: {}", e),
            Self::ImageError(e) => format!("Could not decode or encode image: {}", e),
            Self::WalkError(e) => format!("Could not read source directory: {}", e),
            Self::FileError { file: Some(file), source: Some(source), .. } => {
                format!("{}: {}", file.display(), source.user_message())
            }
            Self::FileError { message, file: Some(file), source: None } => {
                format!("{}: {}", file.display(), message)
            }
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for SquarePadError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for SquarePadError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

/// Error context extension for adding file path information
pub trait ErrorContext<T> {
    /// Wrap the error with the file it concerns
    fn with_file_context(self, file: PathBuf) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<SquarePadError>,
{
    fn with_file_context(self, file: PathBuf) -> Result<T> {
        self.map_err(|e| match e.into() {
            SquarePadError::FileError { message, file: None, source } => SquarePadError::FileError {
                message,
                file: Some(file),
                source,
            },
            already @ SquarePadError::FileError { .. } => already,
            other => SquarePadError::FileError {
                message: other.to_string(),
                file: Some(file),
                source: Some(Box::new(other)),
            },
        })
    }
}
