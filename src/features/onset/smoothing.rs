//! Envelope smoothing and normalization

/// Centered moving average
///
/// Edges average over the part of the window that exists, so the output has
/// the same length as the input and no artificial ramp at the ends.
pub fn moving_average(values: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }

    let radius = window / 2;
    let n = values.len();

    // Prefix sums keep this O(n) regardless of window size
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0f64);
    for &v in values {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + v as f64);
    }

    (0..n)
        .map(|i| {
            let left = i.saturating_sub(radius);
            let right = (i + radius + 1).min(n);
            ((prefix[right] - prefix[left]) / (right - left) as f64) as f32
        })
        .collect()
}

/// Scale values into [0, 1] by their maximum; all-zero input stays zero
pub fn normalize_max(values: &mut [f32]) {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max > 1e-10 {
        for v in values.iter_mut() {
            *v = (*v / max).max(0.0);
        }
    }
}
