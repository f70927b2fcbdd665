//! Local peak detection with a prominence threshold

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A detected local maximum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Sample index (midpoint for flat peaks)
    pub index: usize,
    pub prominence: f64,
    pub left_base: usize,
    pub right_base: usize,
}

/// Indices of local maxima.
///
/// A sample is a maximum when its left neighbour is strictly lower and the
/// first differing sample on its right is strictly lower. Plateaus report
/// their midpoint (rounded down). The first and last samples never qualify.
pub fn local_maxima<T: Float>(signal: &[T]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if signal.len() < 3 {
        return peaks;
    }

    let last = signal.len() - 1;
    let mut i = 1;
    while i < last {
        if signal[i - 1] < signal[i] {
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }
            if signal[ahead] < signal[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Prominence of `peak` and the bases it is measured from.
///
/// Each side is scanned outward until a strictly higher sample or the signal
/// edge; the base is the lowest sample seen on that side. The prominence is
/// the peak height above the higher of the two bases.
pub fn prominence<T: Float>(signal: &[T], peak: usize) -> (f64, usize, usize) {
    let height = signal[peak];

    let mut left_min = height;
    let mut left_base = peak;
    let mut i = peak;
    loop {
        if signal[i] > height {
            break;
        }
        if signal[i] < left_min {
            left_min = signal[i];
            left_base = i;
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = height;
    let mut right_base = peak;
    for (j, &value) in signal.iter().enumerate().skip(peak) {
        if value > height {
            break;
        }
        if value < right_min {
            right_min = value;
            right_base = j;
        }
    }

    let base = if left_min > right_min { left_min } else { right_min };
    let prominence = (height - base).to_f64().unwrap_or(0.0);
    (prominence, left_base, right_base)
}

/// Local maxima whose prominence is at least `min_prominence`
pub fn find_peaks<T: Float>(signal: &[T], min_prominence: f64) -> Vec<Peak> {
    local_maxima(signal)
        .into_iter()
        .filter_map(|index| {
            let (prominence, left_base, right_base) = prominence(signal, index);
            (prominence >= min_prominence).then_some(Peak {
                index,
                prominence,
                left_base,
                right_base,
            })
        })
        .collect()
}
