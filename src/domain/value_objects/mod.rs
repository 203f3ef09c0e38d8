mod attachment_id;
mod attachment_path;
mod backend_location;

pub use attachment_id::{AttachmentId, GENERATED_ID_LEN};
pub use attachment_path::{validate_document_id, AttachmentPath};
pub use backend_location::BackendLocation;
