use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ProductionError;

// @module: Paragraph-level text segmentation

// @const: Blank-line paragraph boundary (one or more empty lines)
static PARAGRAPH_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

/// One paragraph-level unit of text, carried through the whole pipeline.
/// Order is significant and fixed at creation; segments are immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// Position in the original text, starting from 0
    pub index: usize,

    /// Trimmed paragraph text, never empty
    pub text: String,
}

impl TextSegment {
    // @creates: Validated segment
    // @validates: Non-empty trimmed text
    pub fn new(index: usize, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(TextSegment {
            index,
            text: trimmed.to_string(),
        })
    }
}

/// Split raw book text into ordered paragraphs.
///
/// Boundaries are runs of one or more blank lines. Whitespace-only
/// fragments are discarded, and indices are assigned after discarding so
/// they stay dense. Fails with `EmptyInput` when nothing narratable
/// remains.
pub fn split_into_segments(text: &str) -> Result<Vec<TextSegment>, ProductionError> {
    let segments: Vec<TextSegment> = PARAGRAPH_BOUNDARY
        .split(text)
        .filter_map(|fragment| {
            let trimmed = fragment.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .enumerate()
        .map(|(index, text)| TextSegment { index, text })
        .collect();

    if segments.is_empty() {
        return Err(ProductionError::EmptyInput);
    }

    Ok(segments)
}
