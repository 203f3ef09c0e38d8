use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

use super::KeyBuilder;
use crate::{
    domain::{
        errors::{AttachmentError, AttachmentResult},
        models::{Attachment, ByteStream, Payload},
        value_objects::{validate_document_id, AttachmentPath, BackendLocation},
    },
    ports::{
        services::AttachmentService,
        storage::{BlobInfo, BlobStore},
    },
};

/// Attachment store of one collection
#[derive(Clone)]
pub struct AttachmentStore {
    collection: String,
    location: BackendLocation,
    blobs: Arc<dyn BlobStore>,
    keys: KeyBuilder,
    strict_delete: bool,
}

impl AttachmentStore {
    /// Create a store over a blob backend already scoped to `location`'s prefix
    pub fn new(
        collection: impl Into<String>,
        location: BackendLocation,
        blobs: Arc<dyn BlobStore>,
        keys: KeyBuilder,
    ) -> Self {
        Self {
            collection: collection.into(),
            location,
            blobs,
            keys,
            strict_delete: true,
        }
    }

    /// Choose whether deleting a missing attachment fails with `NotFound`
    pub fn with_strict_delete(mut self, strict_delete: bool) -> Self {
        self.strict_delete = strict_delete;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn location(&self) -> &BackendLocation {
        &self.location
    }

    fn path_of(attachment: &Attachment) -> AttachmentResult<&AttachmentPath> {
        attachment
            .path
            .as_ref()
            .ok_or_else(|| AttachmentError::NotInitialized {
                document_id: attachment.document_id.clone(),
            })
    }
}

#[async_trait]
impl AttachmentService for AttachmentStore {
    fn init(&self, attachment: Attachment) -> AttachmentResult<Attachment> {
        self.keys.init(attachment)
    }

    async fn save(&self, mut attachment: Attachment) -> AttachmentResult<Attachment> {
        let path = Self::path_of(&attachment)?.clone();

        let payload = attachment
            .incoming
            .take()
            .ok_or_else(|| AttachmentError::UnsupportedPayload {
                reason: format!("attachment '{}' has no incoming content", path),
            })?;

        let content_type = attachment.content_type.as_deref();
        match payload {
            Payload::Bytes(data) => {
                let size = data.len();
                self.blobs.put(&path, data, content_type).await?;
                debug!(collection = %self.collection, path = %path, size, "saved attachment");
            }
            Payload::Stream(stream) => {
                let size = self.blobs.put_stream(&path, stream, content_type).await?;
                debug!(collection = %self.collection, path = %path, size, "streamed attachment");
            }
        }

        Ok(attachment)
    }

    async fn load(&self, attachment: &Attachment) -> AttachmentResult<Bytes> {
        let path = Self::path_of(attachment)?;
        debug!(collection = %self.collection, path = %path, "loading attachment");
        self.blobs.get(path).await
    }

    async fn get_read_stream(&self, attachment: &Attachment) -> AttachmentResult<ByteStream> {
        let path = Self::path_of(attachment)?;
        debug!(collection = %self.collection, path = %path, "opening attachment stream");
        self.blobs.get_stream(path).await
    }

    async fn delete(&self, attachment: &Attachment) -> AttachmentResult<()> {
        let path = Self::path_of(attachment)?;

        // Most backends delete idempotently, so absence has to be checked first
        if self.strict_delete && !self.blobs.exists(path).await? {
            return Err(AttachmentError::NotFound { path: path.clone() });
        }

        self.blobs.delete(path).await?;
        debug!(collection = %self.collection, path = %path, "deleted attachment");

        Ok(())
    }

    async fn exists(&self, attachment: &Attachment) -> AttachmentResult<bool> {
        let path = Self::path_of(attachment)?;
        self.blobs.exists(path).await
    }

    async fn list_in_document(&self, document_id: &str) -> AttachmentResult<Vec<BlobInfo>> {
        validate_document_id(document_id)?;
        self.blobs.list(Some(document_id)).await
    }

    async fn delete_all_in_document(&self, document_id: &str) -> AttachmentResult<usize> {
        validate_document_id(document_id)?;

        let deleted = self.blobs.delete_prefix(Some(document_id)).await?;
        info!(
            collection = %self.collection,
            document_id,
            deleted,
            "deleted document attachments"
        );

        Ok(deleted)
    }

    async fn clear(&self) -> AttachmentResult<usize> {
        let deleted = self.blobs.delete_prefix(None).await?;
        info!(
            collection = %self.collection,
            location = %self.location,
            deleted,
            "cleared collection attachments"
        );

        Ok(deleted)
    }
}
