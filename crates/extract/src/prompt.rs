use crate::schema::{ChapterInput, ExtractionSection};

/// Marker the model writes in place of the extraction block for non-plot chapters.
pub const SKIP_SENTINEL: &str = "<SKIPPED-EXTRACTION>";
pub const INFORMATION_EXTRACTION_HEADING: &str = "## Information Extraction";
pub const SUMMARY_HEADING: &str = "## General Chapter Summary";
pub const SECTION_MARKER: &str = "###";
pub const CONTINUITY_HEADING: &str = "## Previous Chapter(s) Summary";

const TASK: &str = "Your task is to produce a comprehensive and detailed summary of the current \
chapter, and to extract and organize all significant information into predefined categories: \
Characters, Chronology, Locations, Organizations, Things, and Concepts. The output should be \
thorough and suitable for writing Wikipedia-style entries, so make sure every essential detail \
from the chapter is captured accurately.";

const GENERAL_REMINDERS: &str = r#"- Do not use external knowledge or information beyond what is provided in the chapter and previous context.
- Stick strictly to the information in the chapter context and prior story summaries.
- DO NOT explicitly mention "chapter" or "book" in the response. Refer to the content as if it were a standalone piece of information.
- Follow the exact markdown format and structure given in the instructions, with ALL headings and subheadings and the same number of hashes '#' (like ## Information Extraction)."#;

/// Bullet list the model is given under each `###` heading.
fn section_guidance(section: ExtractionSection) -> &'static str {
    match section {
        ExtractionSection::Entities => {
            r#" - List all important characters introduced or featured in this chapter
 - Provide a detailed description of the character. Include (if available):
 - type of entity (character, monster, abstract force)
 - Name
 - Role in the plot/chapter
 - Personality
 - Relationships with other characters
 - Significance to the plot or characters
 - backstory, motivations, or any other relevant details
 - any other relevant details"#
        }
        ExtractionSection::Chronology => {
            r#" - Identify and list the events that occur or are described in the chapter
 - For each event, provide a detailed description. Include (if available):
 - Name or title of the event
 - Type or category of the event
 - Overarching Conflict name or title
 - Significance to the plot or characters
 - any chronology of the event
 - Background or context leading to the event
 - Characters involved and their roles
 - Locations where the event takes place
 - any other relevant details"#
        }
        ExtractionSection::Locations => {
            r#" - List and describe any important locations introduced or revisited
 - Provide a detailed description of each location. Include (if available):
 - Name of the location
 - significance to the plot or characters
 - physical description or notable features
 - cultural or historical significance
 - any history or background information
 - nearby locations or connections to other places
 - any other relevant details"#
        }
        ExtractionSection::Organizations => {
            r#" - List any important organizations, groups, or factions mentioned or central to the chapter
 - Provide a detailed description of each organization. Include (if available):
 - Name of the organization
 - Purpose or goals
 - Key members or leaders
 - Relationships with other organizations
 - any significant actions or decisions made by the organization
 - any history or background information
 - any other relevant details"#
        }
        ExtractionSection::Things => {
            r#" - List any important items introduced or referenced in the chapter
 - Provide a detailed description of each item. Include (if available):
 - Name of the item
 - Type or category
 - Physical description or notable features
 - Special properties or functions
 - Significance to the plot or characters
 - History or background information
 - Current status or location
 - any related entities or connections
 - any other relevant details"#
        }
        ExtractionSection::Concepts => {
            r#" - List any key concepts, ideas, or themes explored in the chapter
 - Provide a detailed description of each concept. Include (if available):
 - Name or title of the concept
 - Definition or explanation
 - Significance to the plot or characters
 - any examples or instances in the chapter
 - any connections to other concepts or themes
 - any other relevant details"#
        }
        ExtractionSection::StoryArc => {
            r#"- Identify and describe the overarching conflict or main storyline based on this chapter and previous context
- Provide a detailed description of the conflict. Include (if available):
    - Proper name or title of the conflict
    - Description of the conflict
    - any history or background information
    - any other relevant details"#
        }
    }
}

fn instructions(with_continuity: bool) -> String {
    let mut text = format!(
        r#"## Non-Plot Content
- Identify if the chapter is non-plot content (e.g., front matter, acknowledgments, table of contents, etc.)
- If the chapter is non-plot content, skip Information Extraction and replace its content with "{SKIP_SENTINEL}"

{INFORMATION_EXTRACTION_HEADING}

For each category below, extract relevant details from the chapter. Present the information in a clear and organized manner, using bullet points or numbered lists where appropriate.
Keep every `###` heading below, in order, even when a category has nothing to report; write "- None" under it instead.

For all items in each category, explain why you chose them and how they contribute to the plot of the entire story. Rank the importance of each item as very high, high, medium, low, or very low.
"#
    );

    for section in ExtractionSection::ALL {
        text.push_str(&format!(
            "\n{SECTION_MARKER} {}\n{}\n",
            section.title(),
            section_guidance(section)
        ));
    }

    text.push_str(&format!(
        r#"
{SUMMARY_HEADING}
- Write a detailed summary of the entire chapter (approximately 300-500 words).
- Focus on key plot developments, character actions and interactions, significant events, and any important revelations.
- Ensure the summary is coherent and logically flows from one point to the next.
- This should not be explicitly for "this chapter" but a general summary of the chapter's content."#
    ));

    if with_continuity {
        text.push_str(&format!(
            r#"

{CONTINUITY_HEADING}
- Using the previous chapter context, write a summary of the previous chapter(s) to provide continuity and context for the current chapter."#
        ));
    }

    text
}

/// Build the read-chapter prompt. Optional context blocks are included only
/// when they are non-blank.
pub fn build_read_chapter_prompt(input: &ChapterInput) -> String {
    let mut prompt = format!("# Task\n{TASK}\n");

    if let Some(story_so_far) = input.story_so_far() {
        prompt.push_str(&format!("\n# Story So Far\n{}\n", story_so_far));
    }

    let previous_context = input.previous_context();
    if let Some(previous) = previous_context {
        prompt.push_str(&format!("\n# Previous Chapter(s) Context\n{}\n", previous));
    }

    prompt.push_str(&format!(
        r#"
# Chapter Context
## Chapter Title: {}
## Chapter Content:
---
{}
---

# Instructions
---
{}
---

# General Reminders
{GENERAL_REMINDERS}
"#,
        input.title,
        input.content,
        instructions(previous_context.is_some())
    ));

    prompt
}

/// The prompt rendered with placeholder values, every optional block included.
pub fn mock_template() -> String {
    let input = ChapterInput::new("{{title}}", "{{content}}")
        .with_story_so_far("<OPT>{{story_so_far}}</OPT>")
        .with_previous_context("<OPT>{{prev_chap_context}}</OPT>");
    build_read_chapter_prompt(&input)
}

/// Estimate token count (rough: 1.3 tokens per word)
pub fn estimate_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f64 * 1.3) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter() -> ChapterInput {
        ChapterInput::new("The Long Road", "Mara left the village at dawn.")
    }

    #[test]
    fn test_mandatory_headings_without_context() {
        let prompt = build_read_chapter_prompt(&chapter());

        assert!(prompt.starts_with("# Task\n"));
        assert!(prompt.contains("## Chapter Title: The Long Road"));
        assert!(prompt.contains("Mara left the village at dawn."));
        assert!(prompt.contains("\n## Non-Plot Content\n"));
        assert!(prompt.contains(&format!("\n{INFORMATION_EXTRACTION_HEADING}\n")));
        for section in ExtractionSection::ALL {
            assert!(prompt.contains(&format!("\n### {}\n", section.title())));
        }
        assert!(prompt.contains(&format!("\n{SUMMARY_HEADING}\n")));
        assert!(prompt.contains(SKIP_SENTINEL));

        assert!(!prompt.contains("# Story So Far"));
        assert!(!prompt.contains("# Previous Chapter(s) Context"));
        assert!(!prompt.contains(CONTINUITY_HEADING));
    }

    #[test]
    fn test_sections_appear_in_order() {
        let prompt = build_read_chapter_prompt(&chapter());
        let positions: Vec<usize> = ExtractionSection::ALL
            .iter()
            .map(|s| prompt.find(&format!("### {}\n", s.title())).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.find(INFORMATION_EXTRACTION_HEADING).unwrap() < positions[0]);
        assert!(prompt.find(SUMMARY_HEADING).unwrap() > positions[6]);
    }

    #[test]
    fn test_section_guidance_keeps_every_bullet() {
        let prompt = build_read_chapter_prompt(&chapter());
        assert!(prompt.contains("Keep every `###` heading below, in order"));

        let chronology = section_guidance(ExtractionSection::Chronology);
        assert!(chronology.contains(
            " - Significance to the plot or characters\n - any chronology of the event\n"
        ));
        assert!(
            section_guidance(ExtractionSection::Locations)
                .contains(" - any history or background information\n")
        );

        for section in ExtractionSection::ALL {
            let guidance = section_guidance(section);
            assert!(guidance.ends_with("any other relevant details"), "{section:?}");
            assert!(prompt.contains(guidance));
        }
    }

    #[test]
    fn test_continuity_clause_only_with_previous_context() {
        let with_previous = chapter().with_previous_context("Mara found the map.");
        let prompt = build_read_chapter_prompt(&with_previous);
        assert!(prompt.contains("# Previous Chapter(s) Context\nMara found the map.\n"));
        assert!(prompt.contains(CONTINUITY_HEADING));
        assert!(prompt.find(CONTINUITY_HEADING).unwrap() > prompt.find(SUMMARY_HEADING).unwrap());

        let blank_previous = chapter().with_previous_context("  \n");
        let prompt = build_read_chapter_prompt(&blank_previous);
        assert!(!prompt.contains(CONTINUITY_HEADING));
        assert!(!prompt.contains("# Previous Chapter(s) Context"));
    }

    #[test]
    fn test_story_so_far_does_not_add_continuity_clause() {
        let input = chapter().with_story_so_far("A drought has lasted three years.");
        let prompt = build_read_chapter_prompt(&input);
        assert!(prompt.contains("# Story So Far\nA drought has lasted three years.\n"));
        assert!(!prompt.contains(CONTINUITY_HEADING));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let input = chapter()
            .with_story_so_far("so far")
            .with_previous_context("before");
        assert_eq!(
            build_read_chapter_prompt(&input),
            build_read_chapter_prompt(&input.clone())
        );
    }

    #[test]
    fn test_mock_template_placeholders() {
        let template = mock_template();
        assert!(template.contains("## Chapter Title: {{title}}"));
        assert!(template.contains("{{content}}"));
        assert!(template.contains("<OPT>{{story_so_far}}</OPT>"));
        assert!(template.contains("<OPT>{{prev_chap_context}}</OPT>"));
        assert!(template.contains(CONTINUITY_HEADING));
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("one two three four five six seven eight nine ten"), 13);
    }
}
