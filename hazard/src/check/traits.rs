use crate::delta::FrameMetrics;

/// One independent hazard test applied to a frame pair's metrics.
///
/// Implementations only ever see pairs with at least one differing pixel.
pub trait HazardCheck: Send + Sync {
    /// Returns `true` if the pair looks hazardous under this test.
    fn triggered(&self, metrics: &FrameMetrics) -> bool;

    /// Human-readable name for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}
