//! Histogram binning and Gaussian kernel density estimates

use crate::boxplot::{quantile, sorted_finite};
use serde::{Deserialize, Serialize};

/// Equal-width histogram over the data range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite values of `data`.
    ///
    /// The bin width is the smaller of the Sturges and Freedman-Diaconis
    /// widths (Sturges alone when the IQR is zero), with the bin count capped
    /// at `max_bins`. A constant series gets a single bin of width 1 centred
    /// on the value.
    pub fn compute(data: &[f64], max_bins: usize) -> Option<Self> {
        let sorted = sorted_finite(data);
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        if max <= min {
            return Some(Histogram {
                edges: vec![min - 0.5, min + 0.5],
                counts: vec![sorted.len()],
            });
        }

        let bins = auto_bin_count(&sorted).clamp(1, max_bins.max(1));
        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &value in &sorted {
            let bin = (((value - min) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Bin heights normalized so the bar areas sum to one
    pub fn density(&self) -> Vec<f64> {
        let scale = self.total() as f64 * self.bin_width();
        if scale <= 0.0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts.iter().map(|&count| count as f64 / scale).collect()
    }
}

fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];

    let sturges = range / (n.log2() + 1.0);
    let iqr = match (quantile(sorted, 0.75), quantile(sorted, 0.25)) {
        (Some(q3), Some(q1)) => q3 - q1,
        _ => 0.0,
    };
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);

    let width = if fd > 0.0 { sturges.min(fd) } else { sturges };
    (range / width).ceil() as usize
}

/// Gaussian kernel density estimate sampled on a regular grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityCurve {
    pub xs: Vec<f64>,
    /// Probability density at each grid point
    pub density: Vec<f64>,
    pub bandwidth: f64,
}

impl DensityCurve {
    /// Estimate over `[min, max]` of the data with Scott's rule bandwidth.
    ///
    /// `None` for fewer than two finite values or zero variance.
    pub fn estimate(data: &[f64], points: usize) -> Option<Self> {
        let sorted = sorted_finite(data);
        if sorted.len() < 2 || points < 2 {
            return None;
        }

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        if variance <= 0.0 {
            return None;
        }

        let bandwidth = variance.sqrt() * n.powf(-0.2);
        let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

        let (min, max) = (sorted[0], sorted[sorted.len() - 1]);
        let step = (max - min) / (points - 1) as f64;
        let xs: Vec<f64> = (0..points).map(|i| min + step * i as f64).collect();

        let density = xs
            .iter()
            .map(|&x| {
                let sum: f64 = sorted
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                sum * norm
            })
            .collect();

        Some(DensityCurve { xs, density, bandwidth })
    }
}
