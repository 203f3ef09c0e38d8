use super::ValidationError;
use crate::domain::value_objects::AttachmentPath;

/// Errors that can occur during attachment operations
#[derive(Debug, Clone)]
pub enum AttachmentError {
    /// No object exists at the attachment's path
    NotFound { path: AttachmentPath },

    /// `save` was called without an incoming payload
    UnsupportedPayload { reason: String },

    /// The attachment was used before its key was built
    NotInitialized { document_id: String },

    /// A value object failed validation
    Validation(ValidationError),

    /// Backend or transport failure, passed through unchanged
    Backend {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl AttachmentError {
    /// True when the error means the object is missing, as opposed to the
    /// backend being unavailable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AttachmentError::NotFound { .. })
    }
}

impl std::fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentError::NotFound { path } => {
                write!(f, "Attachment not found: {}", path)
            }
            AttachmentError::UnsupportedPayload { reason } => {
                write!(f, "Unsupported attachment payload: {}", reason)
            }
            AttachmentError::NotInitialized { document_id } => {
                write!(
                    f,
                    "Attachment of document '{}' has no storage path; call init first",
                    document_id
                )
            }
            AttachmentError::Validation(err) => {
                write!(f, "Validation error: {}", err)
            }
            AttachmentError::Backend { message, source } => match source {
                Some(source) => write!(f, "Storage backend error: {}: {}", message, source),
                None => write!(f, "Storage backend error: {}", message),
            },
        }
    }
}

impl std::error::Error for AttachmentError {}

impl From<ValidationError> for AttachmentError {
    fn from(err: ValidationError) -> Self {
        AttachmentError::Validation(err)
    }
}

/// Result type for attachment operations
pub type AttachmentResult<T> = Result<T, AttachmentError>;
