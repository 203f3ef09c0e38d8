use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// Symbols used for generated identifiers: digits then lowercase letters
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a generated identifier (~124 bits of entropy)
pub const GENERATED_ID_LEN: usize = 24;

const MAX_ID_LEN: usize = 255;

/// Identifier of an attachment within its document's attachment set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttachmentId(String);

impl AttachmentId {
    /// Create an AttachmentId from an existing value, with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyAttachmentId);
        }

        if value.len() > MAX_ID_LEN {
            return Err(ValidationError::AttachmentIdTooLong {
                actual: value.len(),
                max: MAX_ID_LEN,
            });
        }

        // The id is the last path segment, so it may not contain separators
        if let Some(c) = value.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(ValidationError::InvalidAttachmentIdCharacter(c));
        }

        if value == "." || value == ".." {
            return Err(ValidationError::RelativeSegment(value));
        }

        Ok(Self(value))
    }

    /// Generate a fresh random identifier.
    ///
    /// Collision resistance is the only goal here, the value is not a secret.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..GENERATED_ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        Self(id)
    }

    /// Generate a fresh identifier suffixed with `.extension`
    pub fn generate_with_extension(extension: &str) -> Result<Self, ValidationError> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Ok(Self::generate());
        }

        Self::new(format!("{}.{}", Self::generate().0, extension))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AttachmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttachmentId> for String {
    fn from(id: AttachmentId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
