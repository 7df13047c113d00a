//! Recovers the typed sections of a read-chapter reply.
//!
//! The reply must carry the headings the prompt dictates, at the exact depth
//! and in the exact order. Headings are matched as whole lines, so a `####`
//! sub-heading inside a section never starts a new one.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::prompt::{INFORMATION_EXTRACTION_HEADING, SKIP_SENTINEL, SUMMARY_HEADING};
use crate::schema::{ChapterResponse, ExtractionResult, ExtractionSection};

const SUMMARY_TITLE: &str = "## Chapter Summary";

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| heading_line(SUMMARY_HEADING));

static EXTRACTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| heading_line(INFORMATION_EXTRACTION_HEADING));

// Exactly three hashes; the title may be empty. `R` treats CRLF as a line end.
static SECTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^###[ \t]*([^#\r\n][^\r\n]*)?$")
        .expect("section heading pattern is valid")
});

// A trailing colon is tolerated, as it is on section titles.
fn heading_line(heading: &str) -> Regex {
    Regex::new(&format!(r"(?mR)^{}[ \t]*:?[ \t]*$", regex::escape(heading)))
        .expect("escaped heading pattern is valid")
}

/// Parse a raw model reply.
///
/// The summary heading is always required. When the skip sentinel appears
/// anywhere in the reply the extraction block is not read at all.
pub fn parse_response(response: &str) -> ParseResult<ChapterResponse> {
    let summary = SUMMARY_LINE
        .find(response)
        .ok_or(ParseError::MissingHeading { heading: SUMMARY_HEADING })?;

    let chapter_summary = format!("{SUMMARY_TITLE}{}", &response[summary.end()..]);

    if response.contains(SKIP_SENTINEL) {
        debug!("Reply flagged as non-plot content, skipping extraction");
        return Ok(ChapterResponse::skipped(response.to_string(), chapter_summary));
    }

    let block = extraction_block(&response[..summary.start()])?;
    let sections = split_sections(block)?;

    Ok(ChapterResponse::extracted(
        response.to_string(),
        ExtractionResult::from_sections(sections),
        chapter_summary,
    ))
}

/// Text after the `## Information Extraction` line, trimmed.
fn extraction_block(before_summary: &str) -> ParseResult<&str> {
    let heading = EXTRACTION_LINE
        .find(before_summary)
        .ok_or(ParseError::MissingHeading {
            heading: INFORMATION_EXTRACTION_HEADING,
        })?;

    Ok(before_summary[heading.end()..].trim())
}

/// Split the extraction block at its `###` headings, validating count and
/// order before any text is assigned. Anything ahead of the first heading is
/// dropped.
fn split_sections(block: &str) -> ParseResult<[String; 7]> {
    let headings: Vec<(usize, &str)> = SECTION_LINE
        .captures_iter(block)
        .filter_map(|caps| {
            let line = caps.get(0)?;
            let title = caps.get(1).map_or("", |m| m.as_str());
            Some((line.start(), title))
        })
        .collect();

    if headings.len() != ExtractionSection::ALL.len() {
        return Err(ParseError::SectionCount {
            expected: ExtractionSection::ALL.len(),
            found: headings.len(),
        });
    }

    let expected = ExtractionSection::ALL.iter().zip(&headings);
    for (position, (section, (_, title))) in expected.enumerate() {
        if !section.matches_title(title) {
            return Err(ParseError::SectionOrder {
                position: position + 1,
                expected: section.title(),
                found: title.trim().to_string(),
            });
        }
    }

    let mut bounds: Vec<usize> = headings.iter().map(|(start, _)| *start).collect();
    bounds.push(block.len());

    Ok(std::array::from_fn(|i| block[bounds[i]..bounds[i + 1]].to_string()))
}
