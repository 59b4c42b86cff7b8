//! Heading outline and BLUF ("bottom line up front") sections.
//!
//! Every h2 opens a section whose record is the first content block that
//! follows the heading. The section state machine:
//!
//! ```text
//! Idle -> Titling (<h2>) -> AwaitingBlock (</h2>) -> Capturing (first block)
//!      -> Settled (block end, or a second block) -> Idle (next heading / body end)
//! ```

use super::clip;
use super::pattern;
use super::signals::{BlufSection, Heading};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
/// Tags that can open a section's first content block.
const BLOCK_TAGS: &[&str] = &["p", "ul", "ol", "table", "div"];
/// Innermost tags whose text counts toward a block being captured.
const CAPTURE_TAGS: &[&str] = &[
    "p", "ul", "ol", "table", "div", "li", "td", "th", "span", "a", "strong", "em", "b", "i",
];
const HEADING_LIMIT: usize = 120;
const CONTENT_LIMIT: usize = 250;

#[derive(Debug, Default)]
enum Section {
    #[default]
    Idle,
    /// Inside an `<h2>`; its text is not known yet.
    Titling,
    AwaitingBlock {
        heading: String,
    },
    Capturing {
        heading: String,
        fragments: Vec<String>,
    },
    Settled {
        heading: String,
        fragments: Vec<String>,
    },
}

#[derive(Debug, Default)]
pub struct OutlineAnalyzer {
    headings: Vec<Heading>,
    heading_text: Vec<String>,
    section: Section,
    sections: Vec<BlufSection>,
}

impl OutlineAnalyzer {
    pub fn start_tag(&mut self, name: &str) {
        if HEADING_TAGS.contains(&name) {
            self.heading_text.clear();
            // A new heading is an implicit section boundary.
            self.close_section();
            if name == "h2" {
                self.section = Section::Titling;
            }
            return;
        }

        if BLOCK_TAGS.contains(&name) {
            self.section = match std::mem::take(&mut self.section) {
                Section::AwaitingBlock { heading } => Section::Capturing {
                    heading,
                    fragments: Vec::new(),
                },
                // Only the very first block after the heading counts.
                Section::Capturing { heading, fragments } => Section::Settled { heading, fragments },
                other => other,
            };
        }
    }

    pub fn end_tag(&mut self, name: &str) {
        if HEADING_TAGS.contains(&name) {
            let text = self.heading_text.join(" ");
            let text = text.trim();
            let clipped = clip(text, HEADING_LIMIT);
            self.headings.push(Heading {
                tag: name.to_uppercase(),
                text: clipped.clone(),
                is_question: pattern::is_question(text),
            });
            self.heading_text.clear();

            if name == "h2" && !matches!(self.section, Section::Idle) {
                self.section = Section::AwaitingBlock { heading: clipped };
            }
            return;
        }

        if BLOCK_TAGS.contains(&name) {
            self.section = match std::mem::take(&mut self.section) {
                Section::Capturing { heading, fragments } => Section::Settled { heading, fragments },
                other => other,
            };
            return;
        }

        if name == "body" {
            self.close_section();
        }
    }

    /// `text` is already trimmed and non-empty.
    pub fn text(&mut self, text: &str, innermost: Option<&str>) {
        let Some(tag) = innermost else {
            return;
        };
        if HEADING_TAGS.contains(&tag) {
            self.heading_text.push(text.to_string());
        }
        if let Section::Capturing { fragments, .. } = &mut self.section {
            if CAPTURE_TAGS.contains(&tag) {
                fragments.push(text.to_string());
            }
        }
    }

    /// End of input: a section still open is closed as if the body ended.
    pub fn finish(mut self) -> (Vec<Heading>, Vec<BlufSection>) {
        self.close_section();
        (self.headings, self.sections)
    }

    fn close_section(&mut self) {
        match std::mem::take(&mut self.section) {
            Section::AwaitingBlock { heading } => self.sections.push(bluf_section(heading, &[])),
            Section::Capturing { heading, fragments } | Section::Settled { heading, fragments } => {
                self.sections.push(bluf_section(heading, &fragments))
            }
            // An h2 still being titled is not a section yet.
            untouched @ (Section::Idle | Section::Titling) => self.section = untouched,
        }
    }
}

fn bluf_section(heading: String, fragments: &[String]) -> BlufSection {
    let joined = fragments.join(" ");
    let first_content = clip(joined.trim(), CONTENT_LIMIT);
    BlufSection {
        heading,
        word_count: first_content.split_whitespace().count(),
        starts_with_answer: pattern::starts_with_answer(&first_content),
        pattern_type: pattern::classify(&first_content),
        first_content,
    }
}
