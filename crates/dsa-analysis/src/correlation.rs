//! Pearson correlation between sensor channels

use num_traits::Float;

/// Pearson correlation of two equally indexed series.
///
/// Pairs where either value is not finite are skipped. Returns `None` when
/// fewer than two pairs remain or either side has zero variance.
pub fn pearson<T: Float>(x: &[T], y: &[T]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(&a, &b)| {
            let (a, b) = (a.to_f64()?, b.to_f64()?);
            (a.is_finite() && b.is_finite()).then_some((a, b))
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Correlations of every column against a few target columns.
///
/// Entry `[row][k]` is the correlation of `columns[row]` with
/// `columns[targets[k]]`. A column paired with itself is exactly 1 when it
/// has non-zero variance; entries that cannot be computed are `None`.
pub fn correlation_block<T: Float>(columns: &[Vec<T>], targets: &[usize]) -> Vec<Vec<Option<f64>>> {
    columns
        .iter()
        .enumerate()
        .map(|(row, column)| {
            targets
                .iter()
                .map(|&target| {
                    let r = pearson(column, &columns[target]);
                    if row == target {
                        r.map(|_| 1.0)
                    } else {
                        r
                    }
                })
                .collect()
        })
        .collect()
}
