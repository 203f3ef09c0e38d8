use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

use super::Payload;
use crate::domain::value_objects::{AttachmentId, AttachmentPath};

/// A binary payload attributed to a host document.
///
/// The host owns and persists this record; the store only derives `path` and
/// `public_url` from it and moves `incoming` to the backend on save.
#[derive(Debug, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Option<AttachmentId>,
    pub document_id: String,
    pub extension: Option<String>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub path: Option<AttachmentPath>,
    pub public_url: Option<String>,
    #[serde(skip)]
    pub incoming: Option<Payload>,
}

impl Attachment {
    /// Create a new attachment for a document; id and path are assigned by init
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            id: None,
            document_id: document_id.into(),
            extension: None,
            content_type: None,
            filename: None,
            path: None,
            public_url: None,
            incoming: None,
        }
    }

    /// Refer to an attachment whose id is already known
    pub fn existing(document_id: impl Into<String>, id: AttachmentId) -> Self {
        Self {
            id: Some(id),
            ..Self::new(document_id)
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attach content to upload on the next save
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.incoming = Some(payload.into());
        self
    }

    pub fn with_bytes(self, data: impl Into<Bytes>) -> Self {
        self.with_payload(Payload::Bytes(data.into()))
    }

    pub fn with_stream<S>(self, stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    {
        self.with_payload(Payload::from_stream(stream))
    }

    /// Whether init has already assigned a storage path
    pub fn is_initialized(&self) -> bool {
        self.path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_attachment_can_be_shared_across_tasks() {
        assert_send_sync::<Attachment>();
        assert_send_sync::<Payload>();
    }

    #[test]
    fn test_builder_methods() {
        let attachment = Attachment::new("42")
            .with_extension("txt")
            .with_filename("notes.txt")
            .with_stream(futures::stream::iter(vec![Ok(Bytes::from_static(b"x"))]));

        assert_eq!(attachment.extension.as_deref(), Some("txt"));
        assert_eq!(attachment.filename.as_deref(), Some("notes.txt"));
        assert!(matches!(attachment.incoming, Some(Payload::Stream(_))));
        assert!(!attachment.is_initialized());
    }
}
