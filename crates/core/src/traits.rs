use crate::error::Result;
use crate::models::Item;
use async_trait::async_trait;
use bytes::Bytes;

/// An opened media body, read chunk by chunk
#[async_trait]
pub trait MediaStream: Send {
    /// Declared content length, if the server sent one
    fn content_length(&self) -> Option<u64>;

    /// Next chunk of the body, `None` once it is exhausted
    async fn next_chunk(&mut self) -> Result<Option<Bytes>>;
}

/// Opens media URLs (the server's HTTP streams in production)
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn MediaStream>>;
}

/// Answers whether an item is still being recorded on the server
#[async_trait]
pub trait RecordingProbe: Send + Sync {
    async fn is_recording(&self, item: &Item) -> Result<bool>;
}

/// Probe that compares the declared content length of an item's stream
/// with the sentinel the server uses for unfinished recordings
pub struct SentinelProbe<'a> {
    source: &'a dyn MediaSource,
    sentinel: u64,
}

impl<'a> SentinelProbe<'a> {
    pub fn new(source: &'a dyn MediaSource, sentinel: u64) -> Self {
        Self { source, sentinel }
    }
}

#[async_trait]
impl RecordingProbe for SentinelProbe<'_> {
    async fn is_recording(&self, item: &Item) -> Result<bool> {
        // Only the headers are needed, the body is dropped unread
        let stream = self.source.open(&item.url).await?;
        let recording = stream.content_length() == Some(self.sentinel);
        tracing::debug!(
            "Probed {} ({}): content-length={:?} recording={}",
            item.title,
            item.url,
            stream.content_length(),
            recording
        );
        Ok(recording)
    }
}
