use thiserror::Error;

/// The model reply does not follow the heading layout the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("reply is missing the `{heading}` heading")]
    MissingHeading { heading: &'static str },

    #[error("expected {expected} extraction sections, found {found}")]
    SectionCount { expected: usize, found: usize },

    #[error("extraction section {position} should be `{expected}`, found `{found}`")]
    SectionOrder {
        position: usize,
        expected: &'static str,
        found: String,
    },
}

/// Failures talking to the language model
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("malformed reply: {0}")]
    Parse(#[from] ParseError),
}

pub type ParseResult<T> = Result<T, ParseError>;

pub type LlmResult<T> = Result<T, LlmError>;
