/// Errors raised while setting up an attachment store.
///
/// These are fatal: a collection that hits one of them must not attach.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Backend path lacks a bucket and at least one prefix segment
    InvalidBackendPath { path: String, segments: usize },

    /// Another collection already owns this endpoint, bucket and prefix
    EndpointAlreadyClaimed {
        address: String,
        existing: String,
        conflicting: String,
    },

    /// Public base URL must end with '/'
    InvalidPublicUrl { url: String },

    /// A required setting is absent from the environment
    MissingSetting { name: String },

    /// A setting is present but cannot be parsed
    InvalidSetting { name: String, value: String },

    /// The object store client could not be built
    Backend { message: String },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidBackendPath { path, segments } => {
                write!(
                    f,
                    "Invalid backend path '{}': expected '<bucket>/<prefix>', found {} non-empty segment(s)",
                    path, segments
                )
            }
            ConfigurationError::EndpointAlreadyClaimed {
                address,
                existing,
                conflicting,
            } => {
                write!(
                    f,
                    "Endpoint '{}' is already used by collection '{}'; collection '{}' cannot share it",
                    address, existing, conflicting
                )
            }
            ConfigurationError::InvalidPublicUrl { url } => {
                write!(f, "Public base URL must end with '/': '{}'", url)
            }
            ConfigurationError::MissingSetting { name } => {
                write!(f, "Missing required setting: {}", name)
            }
            ConfigurationError::InvalidSetting { name, value } => {
                write!(f, "Invalid value for setting {}: '{}'", name, value)
            }
            ConfigurationError::Backend { message } => {
                write!(f, "Failed to build storage backend: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
