/*!
 * Tests for paragraph segmentation of book text
 */

use bookwave::errors::ProductionError;
use bookwave::segmenter::{split_into_segments, TextSegment};

/// Test segmentation of a realistic book excerpt with mixed spacing
#[test]
fn test_splitIntoSegments_bookExcerpt_shouldKeepReadingOrder() {
    let text = "The rain had not stopped for three days.\r\n\
It drummed on the tin roof of the station house.\n\
\n\
Inside, Marlowe waited.\n\
\n\
\n\
   \n\
The telegram arrived at noon. It said only: COME HOME.";

    let segments = split_into_segments(text).unwrap();

    assert_eq!(segments.len(), 3);
    assert!(segments[0].text.starts_with("The rain"));
    assert_eq!(segments[1].text, "Inside, Marlowe waited.");
    assert!(segments[2].text.ends_with("COME HOME."));
    assert_eq!(
        segments.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

/// Test that single newlines inside a paragraph never split it
#[test]
fn test_splitIntoSegments_singleNewlines_shouldStayOneParagraph() {
    let text = "Line one\nline two\nline three";

    let segments = split_into_segments(text).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text, "Line one\nline two\nline three");
}

/// Test that blank lines containing only tabs and spaces count as
/// boundaries
#[test]
fn test_splitIntoSegments_whitespaceOnlyBlankLine_shouldSplit() {
    let segments = split_into_segments("One.\n \t \nTwo.").unwrap();

    assert_eq!(segments.len(), 2);
}

/// Test failure for input with no narratable content
#[test]
fn test_splitIntoSegments_onlyWhitespace_shouldReportEmptyInput() {
    let result = split_into_segments("\n\n\t  \n\n   ");

    assert!(matches!(result, Err(ProductionError::EmptyInput)));
}

/// Test segment construction validation
#[test]
fn test_textSegment_new_withPadding_shouldTrim() {
    let segment = TextSegment::new(4, "  padded text  ").unwrap();

    assert_eq!(segment.index, 4);
    assert_eq!(segment.text, "padded text");
}
