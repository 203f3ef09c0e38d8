use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use object_store::{
    path::Path as ObjectPath, prefix::PrefixStore, Attribute, AttributeValue, Attributes,
    ObjectStore as ApacheObjectStore, PutMultipartOptions, PutOptions, PutPayload, WriteMultipart,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::StoreError;
use crate::{
    domain::{
        errors::{AttachmentError, AttachmentResult, ConfigurationError, ValidationError},
        models::{ByteStream, IncomingStream},
        value_objects::AttachmentPath,
    },
    ports::storage::{BlobInfo, BlobStore},
};

/// Part size for streaming uploads; S3 rejects smaller non-final parts
pub const DEFAULT_PART_SIZE: usize = 5 * 1024 * 1024;

/// Number of parts allowed in flight during a streaming upload
const MAX_CONCURRENT_PARTS: usize = 4;

/// Adapter that implements BlobStore on top of Apache object_store,
/// scoped to one collection prefix
pub struct ObjectStoreBlobAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    part_size: usize,
}

impl ObjectStoreBlobAdapter {
    /// Wrap a store whose root is already the collection namespace
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self {
            inner: store,
            part_size: DEFAULT_PART_SIZE,
        }
    }

    /// Wrap a bucket-level store, scoping every key under `prefix`.
    ///
    /// The prefix is used verbatim, so it must be a valid object_store path.
    pub fn with_prefix(
        store: Arc<dyn ApacheObjectStore>,
        prefix: &str,
    ) -> Result<Self, ConfigurationError> {
        let prefix = ObjectPath::parse(prefix).map_err(|_| ConfigurationError::InvalidSetting {
            name: "backend_path".to_string(),
            value: prefix.to_string(),
        })?;

        Ok(Self::new(Arc::new(PrefixStore::new(store, prefix))))
    }

    /// Override the part size used by streaming uploads; zero is rejected
    pub fn with_part_size(mut self, part_size: usize) -> Result<Self, ConfigurationError> {
        if part_size == 0 {
            return Err(ConfigurationError::InvalidSetting {
                name: "part_size".to_string(),
                value: part_size.to_string(),
            });
        }

        self.part_size = part_size;
        Ok(self)
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Parse a key without percent-encoding it, so the stored key is the key asked for
    fn location(key: &str) -> AttachmentResult<ObjectPath> {
        ObjectPath::parse(key).map_err(|e| {
            ValidationError::InvalidStorageKey {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn prefix_location(prefix: Option<&str>) -> AttachmentResult<Option<ObjectPath>> {
        prefix.map(Self::location).transpose()
    }

    fn attributes(content_type: Option<&str>) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(content_type) = content_type {
            attributes.insert(
                Attribute::ContentType,
                AttributeValue::from(content_type.to_string()),
            );
        }
        attributes
    }

    fn map_not_found(
        path: &AttachmentPath,
    ) -> impl FnOnce(object_store::Error) -> AttachmentError + '_ {
        move |e| match e {
            object_store::Error::NotFound { .. } => AttachmentError::NotFound {
                path: path.clone(),
            },
            _ => e.into(),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreBlobAdapter {
    async fn put(
        &self,
        path: &AttachmentPath,
        data: Bytes,
        content_type: Option<&str>,
    ) -> AttachmentResult<()> {
        let location = Self::location(path.as_str())?;
        let options = PutOptions {
            attributes: Self::attributes(content_type),
            ..Default::default()
        };

        debug!(path = %path, size = data.len(), "putting object");
        self.inner
            .put_opts(&location, PutPayload::from(data), options)
            .await?;

        Ok(())
    }

    async fn put_stream(
        &self,
        path: &AttachmentPath,
        mut stream: IncomingStream,
        content_type: Option<&str>,
    ) -> AttachmentResult<u64> {
        let location = Self::location(path.as_str())?;
        let options = PutMultipartOptions {
            attributes: Self::attributes(content_type),
            ..Default::default()
        };

        let upload = self.inner.put_multipart_opts(&location, options).await?;
        let mut writer = WriteMultipart::new_with_chunk_size(upload, self.part_size);

        let copied = async {
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                writer.wait_for_capacity(MAX_CONCURRENT_PARTS).await?;
                writer.write(&chunk);
                written += chunk.len() as u64;
            }
            Ok::<u64, StoreError>(written)
        }
        .await;

        match copied {
            Ok(written) => {
                writer.finish().await.map_err(StoreError::from)?;
                debug!(path = %path, size = written, "streamed object");
                Ok(written)
            }
            Err(err) => {
                if let Err(abort_err) = writer.abort().await {
                    warn!(path = %path, error = %abort_err, "failed to abort multipart upload");
                }
                Err(err.into())
            }
        }
    }

    async fn get(&self, path: &AttachmentPath) -> AttachmentResult<Bytes> {
        let location = Self::location(path.as_str())?;

        let result = self
            .inner
            .get(&location)
            .await
            .map_err(Self::map_not_found(path))?;

        let bytes = result.bytes().await.map_err(Self::map_not_found(path))?;

        Ok(bytes)
    }

    async fn get_stream(&self, path: &AttachmentPath) -> AttachmentResult<ByteStream> {
        let location = Self::location(path.as_str())?;

        let result = self
            .inner
            .get(&location)
            .await
            .map_err(Self::map_not_found(path))?;

        Ok(result
            .into_stream()
            .map_err(std::io::Error::other)
            .boxed())
    }

    async fn exists(&self, path: &AttachmentPath) -> AttachmentResult<bool> {
        let location = Self::location(path.as_str())?;

        match self.inner.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &AttachmentPath) -> AttachmentResult<()> {
        let location = Self::location(path.as_str())?;

        self.inner
            .delete(&location)
            .await
            .map_err(Self::map_not_found(path))?;

        Ok(())
    }

    async fn list(&self, prefix: Option<&str>) -> AttachmentResult<Vec<BlobInfo>> {
        let prefix_path = Self::prefix_location(prefix)?;

        let objects = self
            .inner
            .list(prefix_path.as_ref())
            .map_ok(|meta| BlobInfo {
                key: meta.location.to_string(),
                size: meta.size,
                last_modified: meta.last_modified.into(),
                etag: meta.e_tag,
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(objects)
    }

    async fn delete_prefix(&self, prefix: Option<&str>) -> AttachmentResult<usize> {
        let prefix_path = Self::prefix_location(prefix)?;

        let locations = self
            .inner
            .list(prefix_path.as_ref())
            .map_ok(|meta| meta.location)
            .boxed();

        let deleted = self
            .inner
            .delete_stream(locations)
            .try_fold(0usize, |count, _| async move { Ok(count + 1) })
            .await?;

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AttachmentId;
    use object_store::memory::InMemory;

    fn path(document_id: &str, id: &str) -> AttachmentPath {
        AttachmentPath::join(document_id, &AttachmentId::new(id.to_string()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_basic_blob_operations() {
        let store = Arc::new(InMemory::new());
        let adapter = ObjectStoreBlobAdapter::with_prefix(store.clone(), "files/").unwrap();

        let key = path("42", "file");
        let data = Bytes::from_static(b"test data");

        adapter
            .put(&key, data.clone(), Some("text/plain"))
            .await
            .unwrap();

        assert_eq!(adapter.get(&key).await.unwrap(), data);
        assert!(adapter.exists(&key).await.unwrap());

        // The prefix is applied underneath the logical path
        let raw = store
            .get(&ObjectPath::from("files/42/file"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(raw, data);

        adapter.delete(&key).await.unwrap();
        assert!(!adapter.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let adapter = ObjectStoreBlobAdapter::new(Arc::new(InMemory::new()));
        let key = path("42", "missing");

        let err = adapter.get(&key).await.unwrap_err();
        assert!(matches!(err, AttachmentError::NotFound { path: ref missing } if *missing == key));

        let err = adapter.get_stream(&key).await.err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_stream_spans_parts() {
        let adapter = ObjectStoreBlobAdapter::new(Arc::new(InMemory::new()))
            .with_part_size(8)
            .unwrap();
        let key = path("42", "streamed");

        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"streaming ")),
            Ok(Bytes::from_static(b"world")),
        ];
        let written = adapter
            .put_stream(&key, Box::pin(futures::stream::iter(chunks)), None)
            .await
            .unwrap();

        assert_eq!(written, 21);
        assert_eq!(
            adapter.get(&key).await.unwrap(),
            Bytes::from_static(b"hello streaming world")
        );
    }

    #[tokio::test]
    async fn test_put_stream_error_leaves_nothing() {
        let adapter = ObjectStoreBlobAdapter::new(Arc::new(InMemory::new()));
        let key = path("42", "broken");

        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof")),
        ];
        let result = adapter
            .put_stream(&key, Box::pin(futures::stream::iter(chunks)), None)
            .await;

        assert!(matches!(result, Err(AttachmentError::Backend { .. })));
        assert!(!adapter.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_delete_prefix() {
        let adapter = ObjectStoreBlobAdapter::new(Arc::new(InMemory::new()));
        for (doc, id) in [("4", "a"), ("42", "a"), ("42", "b"), ("7", "c")] {
            adapter
                .put(&path(doc, id), Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }

        let listed = adapter.list(Some("42")).await.unwrap();
        let mut keys: Vec<_> = listed.iter().map(|info| info.key.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["42/a", "42/b"]);

        assert_eq!(adapter.delete_prefix(Some("42")).await.unwrap(), 2);
        assert!(adapter.exists(&path("4", "a")).await.unwrap());
        assert!(adapter.exists(&path("7", "c")).await.unwrap());

        assert_eq!(adapter.delete_prefix(None).await.unwrap(), 2);
        assert!(adapter.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reserved_characters_are_stored_verbatim() {
        let store = Arc::new(InMemory::new());
        let adapter = ObjectStoreBlobAdapter::with_prefix(store.clone(), "files").unwrap();
        let key = path("42", "report~v1[2].pdf");

        adapter
            .put(&key, Bytes::from_static(b"pdf"), None)
            .await
            .unwrap();

        let raw = store
            .get(&ObjectPath::parse("files/42/report~v1[2].pdf").unwrap())
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(raw, Bytes::from_static(b"pdf"));

        let listed = adapter.list(Some("42")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, key.as_str());
    }

    #[test]
    fn test_zero_part_size_is_rejected() {
        let adapter = ObjectStoreBlobAdapter::new(Arc::new(InMemory::new()));
        assert!(matches!(
            adapter.with_part_size(0),
            Err(ConfigurationError::InvalidSetting { ref name, .. }) if name == "part_size"
        ));
    }

    #[test]
    fn test_invalid_prefix_is_rejected() {
        let store = Arc::new(InMemory::new());
        assert!(ObjectStoreBlobAdapter::with_prefix(store, "files/../other").is_err());
    }
}
