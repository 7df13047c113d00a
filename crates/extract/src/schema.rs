use serde::{Deserialize, Serialize};

/// The seven `###` sections of the information-extraction block, in the
/// order the prompt asks for them and the parser expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSection {
    Entities,
    Chronology,
    Locations,
    Organizations,
    Things,
    Concepts,
    StoryArc,
}

impl ExtractionSection {
    pub const ALL: [ExtractionSection; 7] = [
        ExtractionSection::Entities,
        ExtractionSection::Chronology,
        ExtractionSection::Locations,
        ExtractionSection::Organizations,
        ExtractionSection::Things,
        ExtractionSection::Concepts,
        ExtractionSection::StoryArc,
    ];

    /// Heading title as it appears after `### `.
    pub fn title(self) -> &'static str {
        match self {
            ExtractionSection::Entities => "Entities",
            ExtractionSection::Chronology => "Chronology",
            ExtractionSection::Locations => "Locations",
            ExtractionSection::Organizations => "Organizations",
            ExtractionSection::Things => "Things",
            ExtractionSection::Concepts => "Concepts",
            ExtractionSection::StoryArc => "Story Arc",
        }
    }

    /// Case-insensitive title match; a trailing colon is tolerated.
    pub fn matches_title(self, title: &str) -> bool {
        let title = title.trim().trim_end_matches(':').trim_end();
        title.eq_ignore_ascii_case(self.title())
    }
}

/// One chapter to read, plus whatever earlier context the caller has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInput {
    pub title: String,
    pub content: String,
    pub story_so_far: Option<String>,
    pub previous_context: Option<String>,
}

impl ChapterInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            story_so_far: None,
            previous_context: None,
        }
    }

    pub fn with_story_so_far(mut self, story_so_far: impl Into<String>) -> Self {
        self.story_so_far = Some(story_so_far.into());
        self
    }

    pub fn with_previous_context(mut self, previous_context: impl Into<String>) -> Self {
        self.previous_context = Some(previous_context.into());
        self
    }

    /// Story-so-far summary, or `None` when missing or blank
    pub fn story_so_far(&self) -> Option<&str> {
        non_blank(self.story_so_far.as_deref())
    }

    /// Previous chapter context, or `None` when missing or blank
    pub fn previous_context(&self) -> Option<&str> {
        non_blank(self.previous_context.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Raw markdown of each extraction section. Every field keeps its own
/// `### ` heading line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub characters: String,
    pub events: String,
    pub locations: String,
    pub organizations: String,
    pub things: String,
    pub concepts: String,
    pub story_arc: String,
}

impl ExtractionResult {
    pub(crate) fn from_sections(sections: [String; 7]) -> Self {
        let [characters, events, locations, organizations, things, concepts, story_arc] = sections;
        Self {
            characters,
            events,
            locations,
            organizations,
            things,
            concepts,
            story_arc,
        }
    }

    pub fn section(&self, section: ExtractionSection) -> &str {
        match section {
            ExtractionSection::Entities => &self.characters,
            ExtractionSection::Chronology => &self.events,
            ExtractionSection::Locations => &self.locations,
            ExtractionSection::Organizations => &self.organizations,
            ExtractionSection::Things => &self.things,
            ExtractionSection::Concepts => &self.concepts,
            ExtractionSection::StoryArc => &self.story_arc,
        }
    }
}

/// Parsed reply of the read-chapter prompt.
///
/// Only the parser builds this type, so `extraction` is present exactly when
/// `skipped_extraction` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterResponse {
    full_response: String,
    skipped_extraction: bool,
    extraction: Option<ExtractionResult>,
    chapter_summary: String,
}

impl ChapterResponse {
    /// Serialized field names, in declaration order
    pub const FIELDS: [&'static str; 4] = [
        "full_response",
        "skipped_extraction",
        "extraction",
        "chapter_summary",
    ];

    pub(crate) fn skipped(full_response: String, chapter_summary: String) -> Self {
        Self {
            full_response,
            skipped_extraction: true,
            extraction: None,
            chapter_summary,
        }
    }

    pub(crate) fn extracted(
        full_response: String,
        extraction: ExtractionResult,
        chapter_summary: String,
    ) -> Self {
        Self {
            full_response,
            skipped_extraction: false,
            extraction: Some(extraction),
            chapter_summary,
        }
    }

    pub fn full_response(&self) -> &str {
        &self.full_response
    }

    pub fn skipped_extraction(&self) -> bool {
        self.skipped_extraction
    }

    pub fn extraction(&self) -> Option<&ExtractionResult> {
        self.extraction.as_ref()
    }

    pub fn chapter_summary(&self) -> &str {
        &self.chapter_summary
    }
}
