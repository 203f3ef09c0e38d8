use crate::{
    domain::{
        errors::AttachmentResult,
        models::{Attachment, ByteStream},
    },
    ports::storage::BlobInfo,
};
use async_trait::async_trait;
use bytes::Bytes;

/// Port for attachment lifecycle operations of one collection.
/// This is the surface a host document layer calls into.
#[async_trait]
pub trait AttachmentService: Send + Sync + 'static {
    /// Assign an id (if missing) and derive the storage path and public URL
    fn init(&self, attachment: Attachment) -> AttachmentResult<Attachment>;

    /// Upload the incoming payload, returning the attachment without it
    async fn save(&self, attachment: Attachment) -> AttachmentResult<Attachment>;

    /// Fetch the whole content of an attachment
    async fn load(&self, attachment: &Attachment) -> AttachmentResult<Bytes>;

    /// Open the content of an attachment for incremental reading
    async fn get_read_stream(&self, attachment: &Attachment) -> AttachmentResult<ByteStream>;

    /// Remove an attachment's content
    async fn delete(&self, attachment: &Attachment) -> AttachmentResult<()>;

    /// Check whether an attachment's content is stored
    async fn exists(&self, attachment: &Attachment) -> AttachmentResult<bool>;

    /// List the stored attachments of a document
    async fn list_in_document(&self, document_id: &str) -> AttachmentResult<Vec<BlobInfo>>;

    /// Remove every attachment of a document, returning how many were removed
    async fn delete_all_in_document(&self, document_id: &str) -> AttachmentResult<usize>;

    /// Remove every attachment of the collection, returning how many were removed
    async fn clear(&self) -> AttachmentResult<usize>;
}
