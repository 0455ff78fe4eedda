use serde::Serialize;
use std::fmt;

/// Final photosensitivity rating of an animated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safe,
    Risky,
    Dangerous,
    Extreme,
}

impl Category {
    /// Maps an averaged score to a category by exact equality.
    ///
    /// The average is `score_total / diff_frame_count`. Only averages of
    /// exactly 1, 2 or 3 escalate; everything else (fractions, 0, or no
    /// differing pairs at all) is `Safe`. Working on the integer totals
    /// keeps the comparison free of float rounding.
    pub fn from_totals(score_total: u64, diff_frame_count: u64) -> Self {
        if diff_frame_count == 0 || score_total % diff_frame_count != 0 {
            return Category::Safe;
        }
        match score_total / diff_frame_count {
            1 => Category::Risky,
            2 => Category::Dangerous,
            3 => Category::Extreme,
            _ => Category::Safe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safe => "safe",
            Category::Risky => "risky",
            Category::Dangerous => "dangerous",
            Category::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating one animated image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Average per-pair score over the differing pairs, 0 when there are none.
    pub danger_level: f64,
    /// Sum of per-pair scores; `danger_level = danger_score_total / diff_frame_count`.
    pub danger_score_total: u64,
    pub category: Category,
    pub frame_count: u64,
    /// Adjacent pairs with at least one differing pixel.
    pub diff_frame_count: u64,
    pub total_duration_ms: u64,
}

impl Verdict {
    pub fn from_totals(
        danger_score_total: u64,
        diff_frame_count: u64,
        frame_count: u64,
        total_duration_ms: u64,
    ) -> Self {
        let danger_level = if diff_frame_count == 0 {
            0.0
        } else {
            danger_score_total as f64 / diff_frame_count as f64
        };
        Self {
            danger_level,
            danger_score_total,
            category: Category::from_totals(danger_score_total, diff_frame_count),
            frame_count,
            diff_frame_count,
            total_duration_ms,
        }
    }
}
