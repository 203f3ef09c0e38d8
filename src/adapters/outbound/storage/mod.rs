// Infrastructure error types
pub mod error;

// Storage implementations
pub mod object_store_blob_adapter;

// Provider-specific construction
pub mod s3;

// Re-export key types
pub use error::StoreError;
pub use object_store_blob_adapter::{ObjectStoreBlobAdapter, DEFAULT_PART_SIZE};
pub use s3::{create_s3_store, S3Config};
