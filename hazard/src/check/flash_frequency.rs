use tracing::debug;

use super::traits::HazardCheck;
use crate::delta::FrameMetrics;

/// Flags pairs whose current frame is shown for a duration that puts the
/// flicker inside the hazardous band (3 to 30 Hz by default, inclusive).
pub struct FlashFrequencyCheck {
    min_hz: f64,
    max_hz: f64,
}

impl FlashFrequencyCheck {
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// Flicker rate implied by a frame duration; `None` for a zero duration.
    pub fn frequency_hz(duration_ms: u32) -> Option<f64> {
        if duration_ms == 0 {
            return None;
        }
        Some(1.0 / (duration_ms as f64 / 1000.0))
    }
}

impl HazardCheck for FlashFrequencyCheck {
    fn triggered(&self, metrics: &FrameMetrics) -> bool {
        let Some(hz) = Self::frequency_hz(metrics.duration_ms) else {
            debug!("frame has no duration, skipping flash frequency");
            return false;
        };
        let in_band = (self.min_hz..=self.max_hz).contains(&hz);
        debug!(hz = format!("{:.2}", hz), in_band, "flash frequency");
        in_band
    }

    fn name(&self) -> &str {
        "flash_frequency"
    }
}
