use gif_hazard_common::config::EvaluatorConfig;
use gif_hazard_common::frame::{Frame, FrameError, GifSequence};
use gif_hazard_common::verdict::Verdict;
use std::io::{BufRead, Seek};
use tracing::debug;

use crate::aggregate::HazardAccumulator;
use crate::check::{HazardClassifier, PairScore};
use crate::decoder::{DecodeError, FrameDecoder};
use crate::delta::compute_metrics;

/// Photosensitivity evaluator for animated images.
///
/// Holds no per-image state, so one instance can be shared across threads
/// and every call is independent of the ones before it.
pub struct HazardEvaluator {
    config: EvaluatorConfig,
    classifier: HazardClassifier,
}

impl HazardEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        #[cfg(not(feature = "parallel"))]
        if config.parallel {
            tracing::warn!("parallel evaluation requested but the `parallel` feature is off, scoring sequentially");
        }
        Self {
            classifier: HazardClassifier::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Decode and evaluate an encoded image held in memory.
    pub fn evaluate_bytes(&self, bytes: &[u8]) -> Result<Verdict, DecodeError> {
        self.evaluate_frames(FrameDecoder::from_bytes(bytes)?)
    }

    /// Decode and evaluate an encoded image from a reader, frame by frame.
    pub fn evaluate_reader<R: BufRead + Seek>(&self, reader: R) -> Result<Verdict, DecodeError> {
        self.evaluate_frames(FrameDecoder::new(reader)?)
    }

    /// Fold a stream of frames into a verdict.
    ///
    /// Only the previous and current frame are held at any time. The first
    /// error, or a frame whose size differs from its predecessor, aborts the
    /// evaluation without a verdict.
    pub fn evaluate_frames<I>(&self, frames: I) -> Result<Verdict, DecodeError>
    where
        I: IntoIterator<Item = Result<Frame, DecodeError>>,
    {
        let mut acc = HazardAccumulator::new();
        let mut previous: Option<Frame> = None;

        for frame in frames {
            let current = frame?;
            acc.observe_frame(current.duration_ms());
            if let Some(prev) = &previous {
                if prev.dimensions() != current.dimensions() {
                    return Err(FrameError::DimensionMismatch {
                        index: current.index(),
                        expected: prev.dimensions(),
                        got: current.dimensions(),
                    }
                    .into());
                }
                acc.record_pair(self.score_pair(prev, &current));
            }
            previous = Some(current);
        }

        if previous.is_none() {
            return Err(FrameError::Empty.into());
        }
        Ok(self.finish(acc))
    }

    /// Evaluate an already decoded sequence. Cannot fail: the sequence
    /// guarantees at least one frame and uniform dimensions.
    pub fn evaluate_sequence(&self, sequence: &GifSequence) -> Verdict {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return self.evaluate_parallel(sequence);
        }

        let mut acc = HazardAccumulator::new();
        let frames = sequence.frames();
        for (i, frame) in frames.iter().enumerate() {
            acc.observe_frame(frame.duration_ms());
            if i > 0 {
                acc.record_pair(self.score_pair(&frames[i - 1], frame));
            }
        }
        self.finish(acc)
    }

    /// Pairs are scored on the rayon pool and their integer totals merged,
    /// which gives the same verdict as the sequential fold.
    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&self, sequence: &GifSequence) -> Verdict {
        use rayon::prelude::*;

        let mut acc = sequence
            .frames()
            .par_windows(2)
            .map(|pair| {
                let mut partial = HazardAccumulator::new();
                partial.record_pair(self.score_pair(&pair[0], &pair[1]));
                partial
            })
            .reduce(HazardAccumulator::new, HazardAccumulator::merge);

        for frame in sequence.frames() {
            acc.observe_frame(frame.duration_ms());
        }
        self.finish(acc)
    }

    /// Compute pair metrics and classify them; `None` for a skipped pair.
    pub fn score_pair(&self, previous: &Frame, current: &Frame) -> Option<PairScore> {
        let metrics =
            compute_metrics(previous, current, self.config.compatible_luminance_threshold);
        debug!(
            frame_index = current.index(),
            different = metrics.different_pixel_count,
            channel_difference = metrics.channel_difference_sum,
            duration_ms = metrics.duration_ms,
            "pair metrics"
        );
        self.classifier.classify(current.index(), &metrics)
    }

    fn finish(&self, acc: HazardAccumulator) -> Verdict {
        let verdict = acc.finish();
        debug!(
            category = %verdict.category,
            danger_level = verdict.danger_level,
            frame_count = verdict.frame_count,
            diff_frame_count = verdict.diff_frame_count,
            total_duration_ms = verdict.total_duration_ms,
            "evaluation complete"
        );
        verdict
    }
}

impl Default for HazardEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}
