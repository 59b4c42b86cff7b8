//! Text heuristics for headings and first content blocks.

use std::sync::LazyLock;

use regex::Regex;

use super::signals::PatternType;

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\?$|^(what|how|why|when|where|who|which|can|do|does|is|are|should)\b").unwrap()
});
static ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z](?i:.*\b(is|are|means|refers|provides|includes|offers|was|were|has|have|can|will|should|does|do)\b)")
        .unwrap()
});
static YESNO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(yes|no)\b").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[$€£¥]?\d").unwrap());
static STEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(step\s+\d|first,?\s|to\s+\w+,?\s|set\s+up|install|create|open|go\s+to|navigate|click|run|start)")
        .unwrap()
});
static VERDICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.{0,60}\b(better|best|worse|winner|recommend|choose|prefer|excels|superior)\b").unwrap()
});
static DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.{0,80}\b(is\s+(a|an|the)\b|refers?\s+to|means|defined\s+as)").unwrap()
});

/// Question-shaped heading: ends with `?` or opens with an interrogative.
pub fn is_question(heading: &str) -> bool {
    QUESTION_RE.is_match(heading)
}

/// Capitalised opening plus a linking or auxiliary verb somewhere after it.
/// A coarse "answers the heading directly" signal.
pub fn starts_with_answer(text: &str) -> bool {
    ANSWER_RE.is_match(text)
}

/// First matching rule wins, in order: yes/no, number, step, verdict, definition.
pub fn classify(text: &str) -> PatternType {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return PatternType::None;
    }

    if YESNO_RE.is_match(&lower) {
        PatternType::YesNo
    } else if NUMBER_RE.is_match(&lower) {
        PatternType::Number
    } else if STEP_RE.is_match(&lower) {
        PatternType::Step
    } else if VERDICT_RE.is_match(&lower) {
        PatternType::Verdict
    } else if DEFINITION_RE.is_match(&lower) {
        PatternType::Definition
    } else {
        PatternType::None
    }
}
