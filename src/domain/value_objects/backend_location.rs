use crate::domain::errors::ConfigurationError;

/// Bucket and key prefix a collection's attachments live under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackendLocation {
    bucket: String,
    prefix: String,
}

impl BackendLocation {
    /// Parse a configured backend path of the form `<bucket>/<prefix>[/...]`.
    ///
    /// Empty segments are dropped. Both the bucket and at least one prefix
    /// segment are required so that collections never write at a bucket root.
    pub fn parse(path: &str) -> Result<Self, ConfigurationError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.len() < 2 {
            return Err(ConfigurationError::InvalidBackendPath {
                path: path.to_string(),
                segments: segments.len(),
            });
        }

        let bucket = segments[0].to_string();
        let prefix = format!("{}/", segments[1..].join("/"));

        Ok(Self { bucket, prefix })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Get the normalized prefix, always ending with a single '/'
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fully qualified address used to detect collections sharing a namespace
    pub fn endpoint_address(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            endpoint.trim_end_matches('/'),
            self.bucket,
            self.prefix
        )
    }
}

impl std::fmt::Display for BackendLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let location = BackendLocation::parse("bucket/attachments").unwrap();
        assert_eq!(location.bucket(), "bucket");
        assert_eq!(location.prefix(), "attachments/");
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        let location = BackendLocation::parse("/bucket//users/avatars/").unwrap();
        assert_eq!(location.bucket(), "bucket");
        assert_eq!(location.prefix(), "users/avatars/");
    }

    #[test]
    fn test_parse_requires_prefix() {
        assert_eq!(
            BackendLocation::parse("bucket"),
            Err(ConfigurationError::InvalidBackendPath {
                path: "bucket".to_string(),
                segments: 1,
            })
        );
        assert!(BackendLocation::parse("bucket/").is_err());
        assert!(BackendLocation::parse("//").is_err());
        assert!(BackendLocation::parse("").is_err());
    }

    #[test]
    fn test_endpoint_address() {
        let location = BackendLocation::parse("bucket/users").unwrap();
        assert_eq!(
            location.endpoint_address("http://localhost:9000/"),
            "http://localhost:9000/bucket/users/"
        );
        assert_eq!(
            location.endpoint_address("http://localhost:9000"),
            "http://localhost:9000/bucket/users/"
        );
    }
}
