pub mod memory;
pub mod payload;
pub mod reader;

pub use memory::InMemoryResponseStore;
pub use payload::ResponsePayload;
pub use reader::{ChapterReader, StoredResponse};

use anyhow::Result;
use async_trait::async_trait;

/// Destination for read-chapter payloads, typically a vector database.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn store(&self, payload: ResponsePayload) -> Result<()>;
}
