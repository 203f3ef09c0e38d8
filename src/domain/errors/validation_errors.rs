/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // DocumentId validation errors
    EmptyDocumentId,
    DocumentIdHasEdgeSlash(String),
    DocumentIdContainsDoubleSlash(String),
    InvalidDocumentIdCharacter(char),

    // AttachmentId validation errors
    EmptyAttachmentId,
    AttachmentIdTooLong {
        actual: usize,
        max: usize,
    },
    InvalidAttachmentIdCharacter(char),

    // AttachmentPath validation errors
    AttachmentPathTooLong {
        actual: usize,
        max: usize,
    },
    RelativeSegment(String),
    InvalidStorageKey {
        key: String,
        reason: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // DocumentId errors
            ValidationError::EmptyDocumentId => write!(f, "Document ID cannot be empty"),
            ValidationError::DocumentIdHasEdgeSlash(id) => {
                write!(f, "Document ID cannot start or end with '/': '{}'", id)
            }
            ValidationError::DocumentIdContainsDoubleSlash(id) => {
                write!(f, "Document ID cannot contain '//': '{}'", id)
            }
            ValidationError::InvalidDocumentIdCharacter(c) => {
                write!(f, "Invalid character in document ID: {:?}", c)
            }

            // AttachmentId errors
            ValidationError::EmptyAttachmentId => write!(f, "Attachment ID cannot be empty"),
            ValidationError::AttachmentIdTooLong { actual, max } => {
                write!(
                    f,
                    "Attachment ID too long: {} bytes (max: {})",
                    actual, max
                )
            }
            ValidationError::InvalidAttachmentIdCharacter(c) => {
                write!(f, "Invalid character in attachment ID: {:?}", c)
            }

            // AttachmentPath errors
            ValidationError::AttachmentPathTooLong { actual, max } => {
                write!(
                    f,
                    "Attachment path too long: {} bytes (max: {})",
                    actual, max
                )
            }
            ValidationError::RelativeSegment(value) => {
                write!(f, "Path segments cannot be '.' or '..': '{}'", value)
            }
            ValidationError::InvalidStorageKey { key, reason } => {
                write!(f, "'{}' is not a valid storage key: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
