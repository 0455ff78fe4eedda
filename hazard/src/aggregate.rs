use gif_hazard_common::verdict::Verdict;

use crate::check::PairScore;

/// Running totals for one evaluation.
///
/// Frames and pair scores are folded in as they arrive; `finish` turns the
/// totals into a [`Verdict`]. Totals are integers, so partial accumulators
/// can be merged in any order with the same result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardAccumulator {
    score_total: u64,
    diff_frame_count: u64,
    frame_count: u64,
    total_duration_ms: u64,
}

impl HazardAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_frame(&mut self, duration_ms: u32) {
        self.frame_count += 1;
        self.total_duration_ms += duration_ms as u64;
    }

    /// Records a pair outcome; skipped pairs (`None`) leave the totals alone.
    pub fn record_pair(&mut self, score: Option<PairScore>) {
        if let Some(score) = score {
            self.score_total += score.eval_count as u64;
            self.diff_frame_count += 1;
        }
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.score_total += other.score_total;
        self.diff_frame_count += other.diff_frame_count;
        self.frame_count += other.frame_count;
        self.total_duration_ms += other.total_duration_ms;
        self
    }

    pub fn finish(self) -> Verdict {
        Verdict::from_totals(
            self.score_total,
            self.diff_frame_count,
            self.frame_count,
            self.total_duration_ms,
        )
    }
}
