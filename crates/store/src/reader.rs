use anyhow::{Context, Result};
use extract::{ChapterInput, ChapterResponse, LanguageModel, ReadChapterAgent};
use tracing::info;
use uuid::Uuid;

use crate::ResponseStore;
use crate::payload::ResponsePayload;

/// A parsed reply together with the id it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    pub id: Uuid,
    pub response: ChapterResponse,
}

/// Reads chapters with an agent and stores every parsed reply.
pub struct ChapterReader<L, S> {
    agent: ReadChapterAgent<L>,
    store: S,
}

impl<L: LanguageModel, S: ResponseStore> ChapterReader<L, S> {
    pub fn new(agent: ReadChapterAgent<L>, store: S) -> Self {
        Self { agent, store }
    }

    pub fn agent(&self) -> &ReadChapterAgent<L> {
        &self.agent
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn read(&mut self, input: &ChapterInput) -> Result<StoredResponse> {
        let response = self
            .agent
            .generate(input)
            .await
            .context(format!("Failed to read chapter: {}", input.title))?;

        self.keep(input, response).await
    }

    /// Parse a canned reply instead of calling the model, then store it.
    pub async fn read_canned(&mut self, reply: &str, input: &ChapterInput) -> Result<StoredResponse> {
        let response = self
            .agent
            .mock_generate(reply, input)
            .context(format!("Failed to parse canned reply for: {}", input.title))?;

        self.keep(input, response).await
    }

    async fn keep(&self, input: &ChapterInput, response: ChapterResponse) -> Result<StoredResponse> {
        let payload = ResponsePayload::new(&input.title, &self.agent.prompt(input), &response)?;
        let id = payload.id;

        self.store
            .store(payload)
            .await
            .context(format!("Failed to store payload {}", id))?;

        info!(id = %id, title = %input.title, "Stored chapter response");
        Ok(StoredResponse { id, response })
    }
}
