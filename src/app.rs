use bon::Builder;
use object_store::{memory::InMemory, ObjectStore as ObjectStoreBackend};
use std::sync::Arc;
use tracing::info;

use crate::{
    adapters::outbound::storage::{
        create_s3_store, ObjectStoreBlobAdapter, S3Config, DEFAULT_PART_SIZE,
    },
    domain::{errors::ConfigurationError, value_objects::BackendLocation},
    services::{AttachmentStore, EndpointRegistry, KeyBuilder},
};

/// Endpoint name used for in-memory backends in registry addresses
pub const IN_MEMORY_ENDPOINT: &str = "memory://local";

const DEFAULT_REGION: &str = "us-east-1";

/// Configuration of one collection's attachment store
#[derive(Debug, Clone, Builder)]
pub struct AttachmentConfig {
    /// Identity of the owning collection, used for the endpoint claim
    #[builder(into)]
    pub collection: String,
    /// `<bucket>/<prefix>[/...]`
    #[builder(into)]
    pub backend_path: String,
    #[builder(default)]
    pub backend: StorageBackend,
    #[builder(default)]
    pub append_extension: bool,
    #[builder(into)]
    pub public_base_url: Option<String>,
    #[builder(default = true)]
    pub strict_delete: bool,
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Fresh in-process store, one per collection
    InMemory { endpoint: String },
    /// Existing bucket-level client shared between collections
    Shared {
        endpoint: String,
        store: Arc<dyn ObjectStoreBackend>,
    },
    /// S3-compatible service
    S3 {
        endpoint: String,
        region: String,
        access_key: Option<String>,
        secret_key: Option<String>,
        allow_http: bool,
    },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::InMemory {
            endpoint: IN_MEMORY_ENDPOINT.to_string(),
        }
    }
}

impl StorageBackend {
    /// Host part of the registry address
    pub fn endpoint(&self) -> &str {
        match self {
            StorageBackend::InMemory { endpoint }
            | StorageBackend::Shared { endpoint, .. }
            | StorageBackend::S3 { endpoint, .. } => endpoint,
        }
    }
}

impl AttachmentConfig {
    /// Read configuration from `ATTACHMENTS_*` environment variables
    pub fn from_env(collection: &str) -> Result<Self, ConfigurationError> {
        Self::from_lookup(collection, |name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Without `ATTACHMENTS_ENDPOINT` the in-memory backend is selected.
    pub fn from_lookup<F>(collection: &str, lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_path = lookup("ATTACHMENTS_BACKEND_PATH").ok_or_else(|| {
            ConfigurationError::MissingSetting {
                name: "ATTACHMENTS_BACKEND_PATH".to_string(),
            }
        })?;

        let backend = match lookup("ATTACHMENTS_ENDPOINT") {
            Some(endpoint) => StorageBackend::S3 {
                allow_http: endpoint.starts_with("http://"),
                endpoint,
                region: lookup("ATTACHMENTS_REGION")
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                access_key: lookup("ATTACHMENTS_ACCESS_KEY"),
                secret_key: lookup("ATTACHMENTS_SECRET_KEY"),
            },
            None => StorageBackend::default(),
        };

        let append_extension =
            parse_flag(&lookup, "ATTACHMENTS_APPEND_EXTENSION")?.unwrap_or(false);
        let strict_delete = parse_flag(&lookup, "ATTACHMENTS_STRICT_DELETE")?.unwrap_or(true);

        Ok(Self {
            collection: collection.to_string(),
            backend_path,
            backend,
            append_extension,
            public_base_url: lookup("ATTACHMENTS_PUBLIC_URL"),
            strict_delete,
        })
    }
}

fn parse_flag<F>(lookup: &F, name: &str) -> Result<Option<bool>, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigurationError::InvalidSetting {
                name: name.to_string(),
                value,
            }),
        },
    }
}

/// Builds the attachment store of a collection
pub struct AttachmentStoreBuilder {
    config: AttachmentConfig,
    registry: Option<Arc<EndpointRegistry>>,
    part_size: Option<usize>,
}

impl AttachmentStoreBuilder {
    pub fn new(config: AttachmentConfig) -> Self {
        Self {
            config,
            registry: None,
            part_size: None,
        }
    }

    /// Claim endpoints in `registry` instead of the process-wide one
    pub fn with_registry(mut self, registry: Arc<EndpointRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Override the part size of streaming uploads. Must be non-zero, and at
    /// least 5 MiB for S3 since S3 rejects smaller non-final parts.
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = Some(part_size);
        self
    }

    /// Validate the configuration, claim the backend namespace and build the store
    pub fn build(self) -> Result<AttachmentStore, ConfigurationError> {
        let config = self.config;

        let location = BackendLocation::parse(&config.backend_path)?;
        let keys = KeyBuilder::new(config.append_extension, config.public_base_url.clone())?;
        let bucket_store = Self::create_bucket_store(&config.backend, &location)?;

        let mut blobs = ObjectStoreBlobAdapter::with_prefix(bucket_store, location.prefix())?;
        if let Some(part_size) = self.part_size {
            if matches!(config.backend, StorageBackend::S3 { .. }) && part_size < DEFAULT_PART_SIZE
            {
                return Err(ConfigurationError::InvalidSetting {
                    name: "part_size".to_string(),
                    value: part_size.to_string(),
                });
            }
            blobs = blobs.with_part_size(part_size)?;
        }

        let address = location.endpoint_address(config.backend.endpoint());
        let registry = self.registry.unwrap_or_else(EndpointRegistry::global);
        registry.claim(&address, &config.collection)?;

        info!(
            collection = %config.collection,
            address = %address,
            "attachment store ready"
        );

        Ok(
            AttachmentStore::new(config.collection, location, Arc::new(blobs), keys)
                .with_strict_delete(config.strict_delete),
        )
    }

    /// Create the bucket-level client for the configured backend
    fn create_bucket_store(
        backend: &StorageBackend,
        location: &BackendLocation,
    ) -> Result<Arc<dyn ObjectStoreBackend>, ConfigurationError> {
        match backend {
            StorageBackend::InMemory { .. } => Ok(Arc::new(InMemory::new())),
            StorageBackend::Shared { store, .. } => Ok(store.clone()),
            StorageBackend::S3 {
                endpoint,
                region,
                access_key,
                secret_key,
                allow_http,
            } => create_s3_store(&S3Config {
                bucket: location.bucket().to_string(),
                region: region.clone(),
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
                endpoint: Some(endpoint.clone()),
                allow_http: *allow_http,
            }),
        }
    }
}

/// Build a store from configuration, claiming in the process-wide registry
pub fn create_attachment_store(
    config: AttachmentConfig,
) -> Result<AttachmentStore, ConfigurationError> {
    AttachmentStoreBuilder::new(config).build()
}
