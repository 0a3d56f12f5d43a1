// File: ./src/model/parser.rs
// Handles Markdown checklist parsing
use crate::model::item::{CategoryBlock, ChecklistDocument, ChecklistItem};
use regex::Regex;
use std::sync::LazyLock;

// - [ ] Title / - [x] Title, at most one leading space
static TOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-\s*\[( |x|X)\]\s*(.+?)\s*$").expect("top-level checklist pattern")
});

// Same checkbox syntax, indented by two or more whitespace characters
static SUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{2,}-\s*\[( |x|X)\]\s*(.+?)\s*$").expect("sub-item checklist pattern")
});

// Every line break Unicode recognises, including a lone `\r`
static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0b\x0c\x1c-\x1e\x{85}\x{2028}\x{2029}]").expect("line break pattern")
});

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("whitespace run pattern"));

/// What a single line of input contributes to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistLine {
    /// Opens a new category. The checkbox state is not kept.
    Category(String),
    /// Belongs to the most recently opened category.
    Item(ChecklistItem),
}

/// Trims whitespace and surrounding `*` markers, then collapses whitespace runs.
///
/// Asterisks inside the text are left alone, so `**a*b**` becomes `a*b`.
pub fn clean_text(s: &str) -> String {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '*');
    WHITESPACE_RUN_RE.replace_all(trimmed, " ").into_owned()
}

/// Classifies one raw line. Blank and non-checklist lines yield `None`.
pub fn classify_line(raw: &str) -> Option<ChecklistLine> {
    let line = raw.trim_end();
    if line.is_empty() {
        return None;
    }

    if !line.starts_with("  ")
        && let Some(caps) = TOP_RE.captures(line)
    {
        return Some(ChecklistLine::Category(clean_text(&caps[2])));
    }

    let caps = SUB_RE.captures(line)?;
    let checked = caps[1].eq_ignore_ascii_case("x");
    Some(ChecklistLine::Item(ChecklistItem::new(
        clean_text(&caps[2]),
        checked,
    )))
}

impl ChecklistDocument {
    /// Parses a Markdown checklist. Never fails: anything that is not a
    /// two-level checkbox list is skipped.
    pub fn parse(text: &str) -> Self {
        let categories = LINE_BREAK_RE.split(text).filter_map(classify_line).fold(
            Vec::<CategoryBlock>::new(),
            |mut blocks, line| {
                match line {
                    ChecklistLine::Category(title) => blocks.push(CategoryBlock::new(title)),
                    // Items before the first category have nowhere to go and are dropped.
                    ChecklistLine::Item(item) => {
                        if let Some(current) = blocks.last_mut() {
                            current.items.push(item);
                        }
                    }
                }
                blocks
            },
        );
        Self { categories }
    }
}
