use tracing::debug;

use super::traits::HazardCheck;
use crate::delta::FrameMetrics;

/// Flags pairs where many pixels change and few of those changes are
/// luminance-compatible.
///
/// `danger = (different / total) / (compatible / different * 100)`.
/// With no compatible pixels the ratio is unbounded and the check fires.
pub struct PixelDangerCheck {
    threshold: f64,
}

impl PixelDangerCheck {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The danger ratio, or `None` when no differing pixel was compatible.
    pub fn danger_percent(metrics: &FrameMetrics) -> Option<f64> {
        if metrics.compatible_count == 0 || metrics.total_pixel_count == 0 {
            return None;
        }
        let different = metrics.different_pixel_count as f64;
        let different_pixel_percentage = different / metrics.total_pixel_count as f64;
        let compatibility_percentage = metrics.compatible_count as f64 / different * 100.0;
        Some(different_pixel_percentage / compatibility_percentage)
    }
}

impl HazardCheck for PixelDangerCheck {
    fn triggered(&self, metrics: &FrameMetrics) -> bool {
        match Self::danger_percent(metrics) {
            Some(danger) => {
                debug!(danger = format!("{:.4}", danger), threshold = self.threshold, "pixel danger");
                danger > self.threshold
            }
            None => {
                debug!(
                    different = metrics.different_pixel_count,
                    "no compatible pixels, pixel danger unbounded"
                );
                true
            }
        }
    }

    fn name(&self) -> &str {
        "pixel_danger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(different: u64, compatible: u64, total: u64) -> FrameMetrics {
        FrameMetrics {
            different_pixel_count: different,
            compatible_count: compatible,
            total_pixel_count: total,
            ..FrameMetrics::default()
        }
    }

    #[test]
    fn mostly_compatible_changes_are_not_dangerous() {
        let check = PixelDangerCheck::new(30.0);
        assert!(!check.triggered(&metrics(4, 4, 12)));
        assert!(!check.triggered(&metrics(4, 1, 12)));
    }

    #[test]
    fn no_compatible_pixels_triggers() {
        let check = PixelDangerCheck::new(30.0);
        assert!(check.triggered(&metrics(4, 0, 12)));
    }

    #[test]
    fn danger_percent_value() {
        // (300 / 3000) / (1 / 300 * 100) = 0.1 / 0.3333 = 0.3
        let danger = PixelDangerCheck::danger_percent(&metrics(300, 1, 3000)).unwrap();
        assert!((danger - 0.3).abs() < 1e-9);
    }

    #[test]
    fn low_threshold_fires_on_finite_ratio() {
        let check = PixelDangerCheck::new(0.25);
        assert!(check.triggered(&metrics(300, 1, 3000)));
    }
}
