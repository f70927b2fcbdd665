//! Box-and-whisker statistics

use serde::{Deserialize, Serialize};

/// Linear-interpolated quantile of ascending `sorted` data, `q` in [0, 1]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Finite values of `data`, ascending
pub fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Five-number summary plus outliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest sample within `q1 - whisker * IQR`
    pub lower_whisker: f64,
    /// Highest sample within `q3 + whisker * IQR`
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    /// Statistics of the finite values in `data`; `None` when there are none
    pub fn compute(data: &[f64], whisker: f64) -> Option<Self> {
        let sorted = sorted_finite(data);
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;

        let iqr = q3 - q1;
        let low_fence = q1 - whisker * iqr;
        let high_fence = q3 + whisker * iqr;

        let fences = low_fence..=high_fence;
        let lower_whisker = sorted.iter().copied().find(|v| fences.contains(v)).unwrap_or(q1);
        let upper_whisker = sorted.iter().copied().rfind(|v| fences.contains(v)).unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Some(BoxStats {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            mean,
            outliers,
            count: sorted.len(),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
