use anyhow::{Context, Result};
use extract::ChapterResponse;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// What gets handed to a vector store for one read chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub id: Uuid,
    pub chapter_title: String,
    pub prompt: String,
    pub response: serde_json::Value,
}

impl ResponsePayload {
    pub fn new(chapter_title: &str, prompt: &str, response: &ChapterResponse) -> Result<Self> {
        let response =
            serde_json::to_value(response).context("Failed to serialize chapter response")?;

        Ok(Self {
            id: Self::generate_id(prompt),
            chapter_title: chapter_title.to_string(),
            prompt: prompt.to_string(),
            response,
        })
    }

    /// Same prompt, same id: a re-read chapter replaces its earlier payload.
    fn generate_id(prompt: &str) -> Uuid {
        let digest = Sha256::digest(prompt.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Uuid::from_bytes(bytes)
    }

    pub fn skipped_extraction(&self) -> bool {
        self.response["skipped_extraction"].as_bool().unwrap_or(false)
    }
}
