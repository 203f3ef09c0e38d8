use bytes::Bytes;
use futures::stream::{BoxStream, Stream};
use std::pin::Pin;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Stream of byte chunks read back from the backend
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// Stream of byte chunks waiting to be uploaded.
///
/// Unlike [`ByteStream`] it must be `Sync`: it travels inside an
/// [`Attachment`](super::Attachment), which is borrowed across `.await` points.
pub type IncomingStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync>>;

/// Content of an attachment waiting to be saved
pub enum Payload {
    /// Whole content already in memory, uploaded with a single put
    Bytes(Bytes),
    /// Content produced incrementally, uploaded in parts
    Stream(IncomingStream),
}

impl Payload {
    /// Wrap any async reader (file, socket, pipe) as a streaming payload
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self::from_stream(ReaderStream::new(reader))
    }

    /// Wrap a stream of chunks as a streaming payload
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static,
    {
        Payload::Stream(Box::pin(stream))
    }

    /// Short name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Bytes(_) => "bytes",
            Payload::Stream(_) => "stream",
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Payload::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(data))
    }
}

impl From<&'static str> for Payload {
    fn from(data: &'static str) -> Self {
        Payload::Bytes(Bytes::from_static(data.as_bytes()))
    }
}

impl From<IncomingStream> for Payload {
    fn from(stream: IncomingStream) -> Self {
        Payload::Stream(stream)
    }
}
