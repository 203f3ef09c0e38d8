pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - attachment records, value objects and errors
pub use domain::{
    Attachment,
    AttachmentError,
    // Value objects
    AttachmentId,
    AttachmentPath,
    AttachmentResult,
    BackendLocation,
    ByteStream,
    IncomingStream,
    // Errors
    ConfigurationError,
    Payload,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{AttachmentService, BlobInfo, BlobStore};

// Service implementations
pub use services::{AttachmentStore, EndpointRegistry, KeyBuilder};

// Store construction and configuration
pub use app::{
    create_attachment_store, AttachmentConfig, AttachmentStoreBuilder, StorageBackend,
    IN_MEMORY_ENDPOINT,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{ObjectStoreBlobAdapter, S3Config};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        Attachment, AttachmentConfig, AttachmentError, AttachmentService, AttachmentStore,
        AttachmentStoreBuilder, ConfigurationError, EndpointRegistry, Payload, StorageBackend,
    };
}
