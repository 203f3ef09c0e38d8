//! S3-compatible backend construction using the object_store crate
//!
//! Builds the bucket-level client a collection's blob adapter is scoped on.

use object_store::{aws::AmazonS3Builder, ObjectStore as ObjectStoreBackend};
use std::sync::Arc;

use crate::domain::errors::ConfigurationError;

/// Configuration for an S3-compatible storage backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

/// Create an S3 store from configuration
pub fn create_s3_store(
    config: &S3Config,
) -> Result<Arc<dyn ObjectStoreBackend>, ConfigurationError> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&config.bucket)
        .with_region(&config.region)
        .with_allow_http(config.allow_http);

    if let Some(access_key) = &config.access_key {
        builder = builder.with_access_key_id(access_key);
    }

    if let Some(secret_key) = &config.secret_key {
        builder = builder.with_secret_access_key(secret_key);
    }

    if let Some(endpoint) = &config.endpoint {
        // MinIO and most self-hosted backends only serve path-style requests
        builder = builder
            .with_endpoint(endpoint)
            .with_virtual_hosted_style_request(false);
    }

    let store = builder.build()?;

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_s3_store_with_endpoint() {
        let config = S3Config {
            bucket: "attachments".to_string(),
            region: "us-east-1".to_string(),
            access_key: Some("minioadmin".to_string()),
            secret_key: Some("minioadmin".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            allow_http: true,
        };

        // Building the client does not touch the network
        assert!(create_s3_store(&config).is_ok());
    }
}
