/*!
 * The audiobook production pipeline.
 *
 * - `segment_pass`: per-paragraph classify → synthesize → score → mix
 * - `orchestrator`: the run-level state machine driving segmentation,
 *   the per-segment pass, concatenation, final stitching, and publishing
 *
 * A run owns its own buffers and capability handles exclusively; hosts
 * wanting concurrent productions use independent orchestrator instances.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod orchestrator;
pub mod segment_pass;

pub use orchestrator::{
    ProductionFailure, ProductionOrchestrator, ProductionOutcome, ProductionProgress,
    ProductionState,
};
pub use segment_pass::{ProcessedSegment, SegmentPass};

/// Cooperative cancellation handle.
///
/// Checked between pipeline steps, never mid-mix. An in-flight external
/// call is allowed to complete; its result is discarded and no further
/// steps execute.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the run holding this token
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
