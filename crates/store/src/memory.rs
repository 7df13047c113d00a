use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::ResponseStore;
use crate::payload::ResponsePayload;

/// Keeps payloads in memory, keyed by payload id.
#[derive(Clone, Default)]
pub struct InMemoryResponseStore {
    payloads: Arc<DashMap<Uuid, ResponsePayload>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &Uuid) -> Option<ResponsePayload> {
        self.payloads.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn clear(&self) {
        self.payloads.clear();
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn store(&self, payload: ResponsePayload) -> Result<()> {
        debug!(id = %payload.id, title = %payload.chapter_title, "Storing chapter payload");
        self.payloads.insert(payload.id, payload);
        Ok(())
    }
}
