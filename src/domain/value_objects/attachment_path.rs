use serde::{Deserialize, Serialize};

use super::AttachmentId;
use crate::domain::errors::ValidationError;

const MAX_PATH_LEN: usize = 1024;

/// Storage key of an attachment: `<document_id>/<attachment_id>`.
///
/// The path is relative to the collection prefix; the prefix is applied by
/// the backend client and never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AttachmentPath(String);

impl AttachmentPath {
    /// Build the path of an attachment inside a document
    pub fn join(document_id: &str, id: &AttachmentId) -> Result<Self, ValidationError> {
        validate_document_id(document_id)?;

        let value = format!("{}/{}", document_id, id.as_str());
        if value.len() > MAX_PATH_LEN {
            return Err(ValidationError::AttachmentPathTooLong {
                actual: value.len(),
                max: MAX_PATH_LEN,
            });
        }

        Ok(Self(value))
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the document part of the path (everything before the last '/')
    pub fn document_id(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(doc, _)| doc)
    }

    /// Get the attachment id part of the path (everything after the last '/')
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }
}

impl TryFrom<String> for AttachmentPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (document_id, id) = value
            .rsplit_once('/')
            .ok_or(ValidationError::EmptyDocumentId)?;
        let id = AttachmentId::new(id.to_string())?;
        Self::join(document_id, &id)
    }
}

impl From<AttachmentPath> for String {
    fn from(path: AttachmentPath) -> Self {
        path.0
    }
}

impl std::fmt::Display for AttachmentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that a document id can be used as the leading part of a key
pub fn validate_document_id(document_id: &str) -> Result<(), ValidationError> {
    if document_id.is_empty() {
        return Err(ValidationError::EmptyDocumentId);
    }

    if document_id.starts_with('/') || document_id.ends_with('/') {
        return Err(ValidationError::DocumentIdHasEdgeSlash(
            document_id.to_string(),
        ));
    }

    if document_id.contains("//") {
        return Err(ValidationError::DocumentIdContainsDoubleSlash(
            document_id.to_string(),
        ));
    }

    if let Some(c) = document_id.chars().find(|c| c.is_control()) {
        return Err(ValidationError::InvalidDocumentIdCharacter(c));
    }

    if document_id
        .split('/')
        .any(|segment| segment == "." || segment == "..")
    {
        return Err(ValidationError::RelativeSegment(document_id.to_string()));
    }

    Ok(())
}
