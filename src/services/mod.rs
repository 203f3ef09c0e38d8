mod attachment_store;
mod endpoint_registry;
mod key_builder;

pub use attachment_store::AttachmentStore;
pub use endpoint_registry::EndpointRegistry;
pub use key_builder::KeyBuilder;
