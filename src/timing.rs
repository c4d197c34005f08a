/*!
 * Per-paragraph timing windows over the concatenated narration timeline.
 *
 * Two ways to derive them:
 * - `from_measured_durations`: each segment's narration clip is produced
 *   separately, so its decoded duration is directly measurable. This is
 *   exact and is what the orchestrator uses.
 * - `estimate_proportional`: splits a single aggregate duration by
 *   relative text length. This is a heuristic, not a bug: its accuracy
 *   depends on a roughly uniform speaking rate across segments. Kept for
 *   callers that only know the total.
 *
 * Both uphold the same invariant: windows partition [0, total] exactly,
 * contiguous and monotonically increasing, with the last end forced to
 * the total to cancel floating-point drift.
 */

use crate::segmenter::TextSegment;

/// Derived timing window for one paragraph. Not authoritative; computed
/// once narration duration is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphTiming {
    /// Paragraph index, matching the segment's index
    pub index: usize,
    /// Window start in seconds
    pub start: f64,
    /// Window end in seconds (exclusive)
    pub end: f64,
    /// The paragraph text
    pub text: String,
    /// Mood carried over from classification, drives background selection
    pub mood: String,
}

/// Stateless timing derivation
#[derive(Debug, Default, Clone)]
pub struct TimingEstimator;

impl TimingEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Build timings from each clip's actual decoded duration.
    ///
    /// `segments`, `moods` and `durations_secs` are parallel, index-aligned
    /// slices; extra entries beyond the shortest are ignored.
    pub fn from_measured_durations(
        &self,
        segments: &[TextSegment],
        moods: &[String],
        durations_secs: &[f64],
    ) -> Vec<ParagraphTiming> {
        let count = segments.len().min(moods.len()).min(durations_secs.len());
        let total: f64 = durations_secs[..count].iter().sum();
        let mut cursor = 0.0;

        let mut timings = Vec::with_capacity(count);
        for i in 0..count {
            let start = cursor;
            cursor += durations_secs[i];
            timings.push(ParagraphTiming {
                index: segments[i].index,
                start,
                end: cursor,
                text: segments[i].text.clone(),
                mood: moods[i].clone(),
            });
        }

        force_exact_cover(&mut timings, total);
        timings
    }

    /// Split `total_duration` proportionally to each segment's text length.
    pub fn estimate_proportional(
        &self,
        segments: &[TextSegment],
        moods: &[String],
        total_duration: f64,
    ) -> Vec<ParagraphTiming> {
        let total_chars: usize = segments.iter().map(|s| s.text.len()).sum();
        if total_chars == 0 {
            return Vec::new();
        }

        let mut cursor = 0.0;
        let count = segments.len().min(moods.len());

        let mut timings = Vec::with_capacity(count);
        for i in 0..count {
            let share = segments[i].text.len() as f64 / total_chars as f64;
            let start = cursor;
            cursor += share * total_duration;
            timings.push(ParagraphTiming {
                index: segments[i].index,
                start,
                end: cursor,
                text: segments[i].text.clone(),
                mood: moods[i].clone(),
            });
        }

        force_exact_cover(&mut timings, total_duration);
        timings
    }
}

/// Pin the final boundary to the exact total so accumulated float drift
/// never leaves a gap or overlap at the end of the timeline.
fn force_exact_cover(timings: &mut [ParagraphTiming], total: f64) {
    if let Some(last) = timings.last_mut() {
        last.end = total;
    }
}
