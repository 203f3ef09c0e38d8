use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::AttachmentResult,
    models::{ByteStream, IncomingStream},
    value_objects::AttachmentPath,
};

/// Port for the object storage backend holding attachment content.
///
/// Paths are relative to the collection prefix; implementations scope every
/// call to that prefix.
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Store a whole object, replacing any existing one
    async fn put(
        &self,
        path: &AttachmentPath,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AttachmentResult<()>;

    /// Store an object from a stream of chunks without buffering it whole.
    /// Returns the number of bytes written.
    async fn put_stream(
        &self,
        path: &AttachmentPath,
        stream: IncomingStream,
        content_type: Option<&str>,
    ) -> AttachmentResult<u64>;

    /// Retrieve a whole object
    async fn get(&self, path: &AttachmentPath) -> AttachmentResult<Bytes>;

    /// Open an object for incremental reading
    async fn get_stream(&self, path: &AttachmentPath) -> AttachmentResult<ByteStream>;

    /// Check if an object exists
    async fn exists(&self, path: &AttachmentPath) -> AttachmentResult<bool>;

    /// Delete an object. Deleting a missing object is not an error here.
    async fn delete(&self, path: &AttachmentPath) -> AttachmentResult<()>;

    /// List objects under a key prefix, or every object when `None`
    async fn list(&self, prefix: Option<&str>) -> AttachmentResult<Vec<BlobInfo>>;

    /// Delete every object under a key prefix, or every object when `None`.
    /// Returns the number of objects removed.
    async fn delete_prefix(&self, prefix: Option<&str>) -> AttachmentResult<usize>;
}

/// Information about a stored object
#[derive(Debug, Clone)]
pub struct BlobInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: std::time::SystemTime,
    pub etag: Option<String>,
}
