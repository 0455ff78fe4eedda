pub mod flash_frequency;
pub mod intensity_swing;
pub mod pixel_danger;
pub mod traits;

use gif_hazard_common::config::EvaluatorConfig;
use tracing::debug;

use crate::delta::FrameMetrics;
use flash_frequency::FlashFrequencyCheck;
use intensity_swing::IntensitySwingCheck;
use pixel_danger::PixelDangerCheck;
use traits::HazardCheck;

/// Score for one adjacent frame pair: how many hazard checks fired (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairScore {
    /// Index of the later frame in the pair.
    pub frame_index: usize,
    pub eval_count: u8,
}

/// Runs every hazard check against a frame pair's metrics.
pub struct HazardClassifier {
    checks: Vec<Box<dyn HazardCheck>>,
}

impl HazardClassifier {
    pub fn new(config: &EvaluatorConfig) -> Self {
        Self {
            checks: vec![
                Box::new(PixelDangerCheck::new(config.pixel_danger_threshold)),
                Box::new(FlashFrequencyCheck::new(config.flash_min_hz, config.flash_max_hz)),
                Box::new(IntensitySwingCheck::new(config.intensity_ratio_threshold)),
            ],
        }
    }

    /// Returns `None` when no pixel differs: such a pair is skipped, not
    /// scored as zero.
    pub fn classify(&self, frame_index: usize, metrics: &FrameMetrics) -> Option<PairScore> {
        if metrics.different_pixel_count == 0 {
            debug!(frame_index, "no differing pixels, pair skipped");
            return None;
        }

        let mut eval_count = 0u8;
        for check in &self.checks {
            if check.triggered(metrics) {
                debug!(frame_index, check = check.name(), "hazard check triggered");
                eval_count += 1;
            }
        }

        debug!(
            frame_index,
            different = metrics.different_pixel_count,
            compatible = metrics.compatible_count,
            eval_count,
            "pair classified"
        );
        Some(PairScore {
            frame_index,
            eval_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HazardClassifier {
        HazardClassifier::new(&EvaluatorConfig::default())
    }

    #[test]
    fn no_difference_is_skipped() {
        let metrics = FrameMetrics {
            duration_ms: 100,
            total_pixel_count: 12,
            ..FrameMetrics::default()
        };
        assert_eq!(classifier().classify(1, &metrics), None);
    }

    #[test]
    fn all_checks_fire() {
        let metrics = FrameMetrics {
            different_pixel_count: 4,
            compatible_count: 0,
            channel_difference_sum: 2400,
            current_intensity_sum: 800.0,
            previous_intensity_sum: 0.0,
            duration_ms: 100,
            total_pixel_count: 12,
        };
        let score = classifier().classify(1, &metrics).unwrap();
        assert_eq!(score.eval_count, 3);
        assert_eq!(score.frame_index, 1);
    }

    #[test]
    fn gentle_slow_change_scores_zero() {
        let metrics = FrameMetrics {
            different_pixel_count: 4,
            compatible_count: 4,
            channel_difference_sum: 120,
            current_intensity_sum: 440.0,
            previous_intensity_sum: 400.0,
            duration_ms: 1000,
            total_pixel_count: 12,
        };
        let score = classifier().classify(3, &metrics).unwrap();
        assert_eq!(score.eval_count, 0);
    }

    #[test]
    fn eval_count_never_exceeds_three() {
        let c = classifier();
        for compatible in 0..=4 {
            for duration_ms in [0, 40, 100, 1000] {
                let metrics = FrameMetrics {
                    different_pixel_count: 4,
                    compatible_count: compatible,
                    current_intensity_sum: 100.0 * compatible as f64,
                    previous_intensity_sum: 300.0,
                    duration_ms,
                    total_pixel_count: 12,
                    ..FrameMetrics::default()
                };
                let score = c.classify(1, &metrics).unwrap();
                assert!(score.eval_count <= 3);
            }
        }
    }
}
