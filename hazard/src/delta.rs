use gif_hazard_common::frame::{Frame, CHANNELS};

/// Aggregate difference measures for one adjacent frame pair.
///
/// Only pixels whose R, G and B all changed count as different; every other
/// field is accumulated over those pixels alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameMetrics {
    pub different_pixel_count: u64,
    /// Differing pixels whose luminance moved less than the compatible threshold.
    pub compatible_count: u64,
    /// Sum of `|dR| + |dG| + |dB|` over differing pixels.
    pub channel_difference_sum: u64,
    pub current_intensity_sum: f64,
    pub previous_intensity_sum: f64,
    /// Display duration of the current frame.
    pub duration_ms: u32,
    /// Channel samples in one frame (`width * height * 3`), the denominator
    /// for the percentage and average-intensity measures.
    pub total_pixel_count: u64,
}

/// Weighted brightness of an RGB pixel.
pub fn intensity(rgb: &[u8]) -> f64 {
    0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64
}

/// Compare two same-size frames pixel by pixel.
pub fn compute_metrics(previous: &Frame, current: &Frame, compatible_threshold: f64) -> FrameMetrics {
    debug_assert_eq!(previous.dimensions(), current.dimensions());

    let mut metrics = FrameMetrics {
        duration_ms: current.duration_ms(),
        total_pixel_count: current.sample_count(),
        ..FrameMetrics::default()
    };

    let pairs = previous
        .pixels()
        .chunks_exact(CHANNELS)
        .zip(current.pixels().chunks_exact(CHANNELS));

    for (prev, cur) in pairs {
        if prev.iter().zip(cur).any(|(p, c)| p == c) {
            continue;
        }
        metrics.different_pixel_count += 1;

        let prev_intensity = intensity(prev);
        let cur_intensity = intensity(cur);
        metrics.previous_intensity_sum += prev_intensity;
        metrics.current_intensity_sum += cur_intensity;
        metrics.channel_difference_sum += prev
            .iter()
            .zip(cur)
            .map(|(&p, &c)| p.abs_diff(c) as u64)
            .sum::<u64>();

        if (cur_intensity - prev_intensity).abs() < compatible_threshold {
            metrics.compatible_count += 1;
        }
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32, h: u32, pixels: Vec<u8>, duration_ms: u32) -> Frame {
        Frame::new(0, w, h, pixels, duration_ms).unwrap()
    }

    #[test]
    fn identical_frames_have_no_difference() {
        let a = frame(2, 2, vec![40; 12], 100);
        let metrics = compute_metrics(&a, &a.clone(), 128.0);
        assert_eq!(metrics.different_pixel_count, 0);
        assert_eq!(metrics.compatible_count, 0);
        assert_eq!(metrics.channel_difference_sum, 0);
        assert_eq!(metrics.total_pixel_count, 12);
        assert_eq!(metrics.duration_ms, 100);
    }

    #[test]
    fn pixel_differs_only_when_every_channel_changes() {
        // pixel 0: all three change; pixel 1: only R and G change
        let prev = frame(2, 1, vec![10, 10, 10, 10, 10, 10], 0);
        let cur = frame(2, 1, vec![20, 30, 40, 50, 60, 10], 0);
        let metrics = compute_metrics(&prev, &cur, 128.0);
        assert_eq!(metrics.different_pixel_count, 1);
        assert_eq!(metrics.channel_difference_sum, 10 + 20 + 30);
    }

    #[test]
    fn compatible_counts_small_luminance_moves() {
        // pixel 0 moves ~10 in luminance, pixel 1 moves 200
        let prev = frame(2, 1, vec![100, 100, 100, 0, 0, 0], 0);
        let cur = frame(2, 1, vec![110, 110, 110, 200, 200, 200], 0);
        let metrics = compute_metrics(&prev, &cur, 128.0);
        assert_eq!(metrics.different_pixel_count, 2);
        assert_eq!(metrics.compatible_count, 1);
        assert!(metrics.compatible_count <= metrics.different_pixel_count);
    }

    #[test]
    fn intensity_sums_cover_differing_pixels_only() {
        let prev = frame(2, 1, vec![0, 0, 0, 7, 7, 7], 0);
        let cur = frame(2, 1, vec![100, 100, 100, 7, 7, 7], 40);
        let metrics = compute_metrics(&prev, &cur, 128.0);
        assert!((metrics.current_intensity_sum - 100.0).abs() < 1e-9);
        assert_eq!(metrics.previous_intensity_sum, 0.0);
        assert_eq!(metrics.duration_ms, 40);
    }

    #[test]
    fn intensity_weights() {
        assert!((intensity(&[255, 0, 0]) - 76.245).abs() < 1e-9);
        assert!((intensity(&[0, 255, 0]) - 149.685).abs() < 1e-9);
        assert!((intensity(&[0, 0, 255]) - 29.07).abs() < 1e-9);
    }
}
