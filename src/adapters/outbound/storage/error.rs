use crate::domain::errors::{AttachmentError, ConfigurationError};
use std::io;
use thiserror::Error as ThisError;

/// Failures inside the storage adapter, before they are mapped to domain errors
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Failed to read upload stream: {0}")]
    Io(#[from] io::Error),
}

/// Convert object_store errors to domain attachment errors.
///
/// Callers that know which attachment was addressed map `NotFound` themselves
/// so the error carries the attachment path; everything else passes through.
impl From<object_store::Error> for AttachmentError {
    fn from(err: object_store::Error) -> Self {
        AttachmentError::Backend {
            message: "Object store operation failed".to_string(),
            source: Some(err.to_string()),
        }
    }
}

/// Convert infrastructure StoreError to domain AttachmentError
impl From<StoreError> for AttachmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ObjectStore(object_err) => object_err.into(),
            StoreError::Io(io_err) => AttachmentError::Backend {
                message: "Upload stream failed".to_string(),
                source: Some(io_err.to_string()),
            },
        }
    }
}

/// Client builder failures surface while a collection is being configured
impl From<object_store::Error> for ConfigurationError {
    fn from(err: object_store::Error) -> Self {
        ConfigurationError::Backend {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_becomes_backend_error() {
        let err: AttachmentError =
            StoreError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")).into();
        match err {
            AttachmentError::Backend { message, source } => {
                assert_eq!(message, "Upload stream failed");
                assert_eq!(source.as_deref(), Some("pipe closed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backend_text_appears_once() {
        let err: AttachmentError = object_store::Error::NotImplemented.into();
        let shown = err.to_string();
        let backend_text = object_store::Error::NotImplemented.to_string();
        assert_eq!(shown.matches(backend_text.as_str()).count(), 1);
    }

    #[test]
    fn test_object_store_error_is_not_not_found() {
        let err: AttachmentError = object_store::Error::NotImplemented.into();
        assert!(!err.is_not_found());
    }
}
