/*!
 * Tests for paragraph timing derivation
 */

use bookwave::segmenter::TextSegment;
use bookwave::timing::TimingEstimator;

fn segments(texts: &[&str]) -> Vec<TextSegment> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| TextSegment::new(index, *text).unwrap())
        .collect()
}

fn moods(names: &[&str]) -> Vec<String> {
    names.iter().map(|m| m.to_string()).collect()
}

/// Test that measured timings carry each paragraph's text and mood through
#[test]
fn test_fromMeasuredDurations_shouldCarrySegmentFields() {
    let estimator = TimingEstimator::new();
    let segs = segments(&["The storm broke.", "Dawn came quietly."]);

    let timings = estimator.from_measured_durations(
        &segs,
        &moods(&["tense", "calm"]),
        &[12.0, 8.5],
    );

    assert_eq!(timings[0].text, "The storm broke.");
    assert_eq!(timings[0].mood, "tense");
    assert_eq!(timings[1].index, 1);
    assert_eq!(timings[1].start, 12.0);
    assert_eq!(timings[1].end, 20.5);
}

/// Test that mismatched slice lengths are truncated to the shortest
#[test]
fn test_fromMeasuredDurations_mismatchedLengths_shouldTruncate() {
    let estimator = TimingEstimator::new();
    let segs = segments(&["one", "two", "three"]);

    let timings =
        estimator.from_measured_durations(&segs, &moods(&["a", "b"]), &[1.0, 2.0, 3.0]);

    assert_eq!(timings.len(), 2);
    // Ignored trailing durations stay out of the covered total
    assert_eq!(timings[1].start, 1.0);
    assert_eq!(timings[1].end, 3.0);
}

/// Test proportional estimation against the measured variant on equal text
#[test]
fn test_estimateProportional_equalTexts_shouldMatchEvenSplit() {
    let estimator = TimingEstimator::new();
    let segs = segments(&["aaaa", "bbbb", "cccc", "dddd"]);
    let mood_list = moods(&["m", "m", "m", "m"]);

    let timings = estimator.estimate_proportional(&segs, &mood_list, 120.0);

    for (i, timing) in timings.iter().enumerate() {
        assert!((timing.start - i as f64 * 30.0).abs() < 1e-9);
    }
    assert_eq!(timings.last().unwrap().end, 120.0);
}

/// Test that zero-duration paragraphs still produce a contiguous timeline
#[test]
fn test_fromMeasuredDurations_zeroDurationClip_shouldStayContiguous() {
    let estimator = TimingEstimator::new();
    let segs = segments(&["spoken", "silent", "spoken again"]);

    let timings = estimator.from_measured_durations(
        &segs,
        &moods(&["a", "b", "c"]),
        &[3.0, 0.0, 5.0],
    );

    assert_eq!(timings[1].start, timings[1].end);
    assert_eq!(timings[2].start, 3.0);
    assert_eq!(timings[2].end, 8.0);
}
