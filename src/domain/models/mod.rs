pub mod attachment;
pub mod payload;

pub use attachment::Attachment;
pub use payload::{ByteStream, IncomingStream, Payload};
