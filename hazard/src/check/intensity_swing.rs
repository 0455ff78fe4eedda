use tracing::debug;

use super::traits::HazardCheck;
use crate::delta::FrameMetrics;

/// Flags pairs where average brightness drops or jumps sharply.
///
/// Both averages divide the intensity sums by the frame's channel sample
/// count; the check fires when `min / max` is at or below the threshold.
pub struct IntensitySwingCheck {
    ratio_threshold: f64,
}

impl IntensitySwingCheck {
    pub fn new(ratio_threshold: f64) -> Self {
        Self { ratio_threshold }
    }

    /// `min / max` of the two average intensities, `None` if both are zero.
    pub fn intensity_ratio(metrics: &FrameMetrics) -> Option<f64> {
        if metrics.total_pixel_count == 0 {
            return None;
        }
        let total = metrics.total_pixel_count as f64;
        let avg_current = metrics.current_intensity_sum / total;
        let avg_previous = metrics.previous_intensity_sum / total;
        let brighter = avg_current.max(avg_previous);
        if brighter <= 0.0 {
            return None;
        }
        Some(avg_current.min(avg_previous) / brighter)
    }
}

impl HazardCheck for IntensitySwingCheck {
    fn triggered(&self, metrics: &FrameMetrics) -> bool {
        match Self::intensity_ratio(metrics) {
            Some(ratio) => {
                debug!(ratio = format!("{:.4}", ratio), threshold = self.ratio_threshold, "intensity swing");
                ratio <= self.ratio_threshold
            }
            None => false,
        }
    }

    fn name(&self) -> &str {
        "intensity_swing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums(previous: f64, current: f64) -> FrameMetrics {
        FrameMetrics {
            different_pixel_count: 1,
            previous_intensity_sum: previous,
            current_intensity_sum: current,
            total_pixel_count: 12,
            ..FrameMetrics::default()
        }
    }

    #[test]
    fn large_swing_triggers_either_direction() {
        let check = IntensitySwingCheck::new(0.55);
        assert!(check.triggered(&sums(0.0, 800.0)));
        assert!(check.triggered(&sums(800.0, 100.0)));
    }

    #[test]
    fn boundary_ratio_triggers() {
        let check = IntensitySwingCheck::new(0.5);
        assert!(check.triggered(&sums(400.0, 200.0)));
    }

    #[test]
    fn similar_brightness_does_not_trigger() {
        let check = IntensitySwingCheck::new(0.55);
        assert!(!check.triggered(&sums(600.0, 500.0)));
    }

    #[test]
    fn all_dark_does_not_trigger() {
        let check = IntensitySwingCheck::new(0.55);
        assert!(!check.triggered(&sums(0.0, 0.0)));
    }
}
