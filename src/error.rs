//! Error types for gallery construction and navigation.

use thiserror::Error;

/// Errors that can occur while building or driving a gallery.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A listing or manifest could not be retrieved
    #[error("Unable to retrieve image listing from {folder}. Error: {message}")]
    Retrieval {
        /// Folder (or manifest URL) that was requested
        folder: String,
        /// Description of the failure, e.g. the HTTP status
        message: String,
    },

    /// Manifest content was not valid JSON for the manifest schema
    #[error("Unable to read image manifest. Error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A requested image id is not part of the current gallery
    #[error("Image not found: {id}")]
    LookupMiss {
        /// The id that was looked up
        id: String,
    },

    /// A construction index fell outside the gallery
    #[error("Image number {index} is not within the bounds of the images array (length {len})")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Number of images in the gallery
        len: usize,
    },
}

impl ViewerError {
    /// Create a retrieval error for a folder.
    pub fn retrieval(folder: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            folder: folder.into(),
            message: message.into(),
        }
    }

    /// Create a lookup miss for an id.
    pub fn lookup_miss(id: impl Into<String>) -> Self {
        Self::LookupMiss { id: id.into() }
    }

    /// Whether this error should replace the display with a diagnostic.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Retrieval { .. } | Self::Parse(_))
    }
}
