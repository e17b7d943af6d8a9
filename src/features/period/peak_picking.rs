//! Peak detection on tempo score curves
//!
//! Finds local maxima in a 1D score curve and refines their position with
//! parabolic interpolation.

const EPSILON: f32 = 1e-10;

/// Find peaks in a signal
///
/// Detects local maxima at or above `threshold`, separated by at least
/// `min_distance` samples.
///
/// # Arguments
///
/// * `signal` - Signal to find peaks in
/// * `threshold` - Minimum peak height (absolute)
/// * `min_distance` - Minimum distance between peaks (in samples)
///
/// # Returns
///
/// Vector of (index, value) pairs for detected peaks, sorted by value (highest first)
///
/// # Algorithm
///
/// 1. Find all local maxima (`value > left && value >= right`, so a flat top
///    reports its first sample); the ends count when they beat their only neighbor
/// 2. Filter by threshold
/// 3. Enforce minimum distance (keep highest peak when too close)
/// 4. Sort by value
///
/// # Example
///
/// ```
/// use rhythmic_dsp::features::period::peak_picking::find_peaks;
///
/// let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
/// let peaks = find_peaks(&signal, 0.5, 2);
/// assert_eq!(peaks, vec![(2, 1.0), (5, 0.9)]);
/// ```
pub fn find_peaks(signal: &[f32], threshold: f32, min_distance: usize) -> Vec<(usize, f32)> {
    if signal.len() < 2 {
        return match signal.first() {
            Some(&v) if v >= threshold && v > EPSILON => vec![(0, v)],
            _ => vec![],
        };
    }

    let last = signal.len() - 1;
    let mut peaks: Vec<(usize, f32)> = (0..=last)
        .filter(|&i| {
            let value = signal[i];
            let rises = i == 0 || value > signal[i - 1];
            let holds = i == last || value >= signal[i + 1];
            let strict_edge = (i != 0 || value > signal[1]) && (i != last || value > signal[last - 1]);
            rises && holds && strict_edge && value >= threshold && value > EPSILON
        })
        .map(|i| (i, signal[i]))
        .collect();

    // Highest first, so distance enforcement keeps the strongest peaks
    peaks.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    if min_distance > 0 && peaks.len() > 1 {
        let mut kept: Vec<(usize, f32)> = Vec::with_capacity(peaks.len());
        for (idx, value) in peaks {
            let too_close = kept
                .iter()
                .any(|&(existing, _)| idx.abs_diff(existing) < min_distance);
            if !too_close {
                kept.push((idx, value));
            }
        }
        peaks = kept;
    }

    log::debug!("Found {} peaks", peaks.len());

    peaks
}

/// Parabolic interpolation around a peak
///
/// # Returns
///
/// `(offset, value)`: the sub-sample offset of the vertex in [-0.5, 0.5]
/// relative to `idx`, and the interpolated height. Edge peaks and flat
/// neighborhoods return `(0.0, signal[idx])`.
pub fn refine_peak(signal: &[f32], idx: usize) -> (f32, f32) {
    let Some(&center) = signal.get(idx) else {
        return (0.0, 0.0);
    };

    if idx == 0 || idx + 1 >= signal.len() {
        return (0.0, center);
    }

    let left = signal[idx - 1];
    let right = signal[idx + 1];
    let curvature = left - 2.0 * center + right;
    if curvature >= -EPSILON {
        return (0.0, center);
    }

    let offset = (0.5 * (left - right) / curvature).clamp(-0.5, 0.5);
    let value = center - 0.25 * (left - right) * offset;
    (offset, value)
}
