pub mod error;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use error::{LlmError, ParseError, ReaderError};
pub use llm::{LanguageModel, LlmConfig, OllamaClient};
pub use parser::parse_response;
pub use prompt::build_read_chapter_prompt;
pub use schema::{ChapterInput, ChapterResponse, ExtractionResult, ExtractionSection};

use tracing::{debug, info, warn};

/// Reads one chapter at a time: builds the prompt, asks the model, parses
/// the reply. The only state kept between calls is the last good response.
pub struct ReadChapterAgent<L> {
    llm: L,
    last_response: Option<ChapterResponse>,
}

impl<L: LanguageModel> ReadChapterAgent<L> {
    pub fn new(llm: L) -> Self {
        Self {
            llm,
            last_response: None,
        }
    }

    pub fn prompt(&self, input: &ChapterInput) -> String {
        build_read_chapter_prompt(input)
    }

    pub fn mock_template(&self) -> String {
        prompt::mock_template()
    }

    pub fn estimate_prompt_tokens(&self, input: &ChapterInput) -> usize {
        prompt::estimate_tokens(&self.prompt(input))
    }

    pub fn response_fields(&self) -> &'static [&'static str] {
        &ChapterResponse::FIELDS
    }

    pub fn last_response(&self) -> Option<&ChapterResponse> {
        self.last_response.as_ref()
    }

    /// Read a chapter with the model.
    pub async fn generate(&mut self, input: &ChapterInput) -> Result<ChapterResponse, ReaderError> {
        let prompt = self.prompt(input);
        debug!(
            title = %input.title,
            estimated_tokens = prompt::estimate_tokens(&prompt),
            "Built read-chapter prompt"
        );

        let reply = self.llm.generate(&prompt).await?;
        Ok(self.accept(&input.title, &reply)?)
    }

    /// Same as [`generate`](Self::generate) but with a canned reply in place
    /// of the model call.
    pub fn mock_generate(
        &mut self,
        reply: &str,
        input: &ChapterInput,
    ) -> Result<ChapterResponse, ParseError> {
        let prompt = self.prompt(input);
        debug!(
            title = %input.title,
            estimated_tokens = prompt::estimate_tokens(&prompt),
            "Using canned reply"
        );

        self.accept(&input.title, reply)
    }

    fn accept(&mut self, title: &str, reply: &str) -> Result<ChapterResponse, ParseError> {
        let response = parse_response(reply).inspect_err(|e| {
            warn!(title = %title, error = %e, "Reply does not follow the expected layout");
        })?;

        info!(
            title = %title,
            skipped_extraction = response.skipped_extraction(),
            "Chapter read"
        );

        self.last_response = Some(response.clone());
        Ok(response)
    }
}
