//! SIMD helpers for the indicator hot loops.
//!
//! These use the `wide` crate for portable SIMD operations.

use wide::f64x4;

#[inline]
fn lanes(data: &[f64], idx: usize) -> f64x4 {
    f64x4::new([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
}

/// Sum of a slice.
pub fn sum_simd(data: &[f64]) -> f64 {
    let chunks = data.len() / 4;
    let mut simd_sum = f64x4::splat(0.0);

    for i in 0..chunks {
        simd_sum += lanes(data, i * 4);
    }

    let mut result = simd_sum.reduce_add();

    // Handle remaining elements
    for &value in &data[(chunks * 4)..] {
        result += value;
    }

    result
}

/// Maximum of a slice, `None` when empty.
pub fn max_simd(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }

    let chunks = data.len() / 4;
    let mut max_vec = f64x4::splat(f64::NEG_INFINITY);

    for i in 0..chunks {
        max_vec = max_vec.max(lanes(data, i * 4));
    }

    let max_arr = max_vec.to_array();
    let mut max = max_arr[0].max(max_arr[1]).max(max_arr[2]).max(max_arr[3]);

    for &value in &data[(chunks * 4)..] {
        max = max.max(value);
    }

    Some(max)
}

/// Money-flow volume per bar: close-location-value × volume.
///
/// Bars with zero range contribute 0.
pub fn money_flow_volume_simd(high: &[f64], low: &[f64], close: &[f64], volume: &[f64]) -> Vec<f64> {
    let len = high.len().min(low.len()).min(close.len()).min(volume.len());
    let mut result = Vec::with_capacity(len);

    let chunks = len / 4;
    for i in 0..chunks {
        let idx = i * 4;
        let h = lanes(high, idx);
        let l = lanes(low, idx);
        let c = lanes(close, idx);
        let v = lanes(volume, idx);

        let numerator = ((c - l) - (h - c)) * v;
        let range = (h - l).to_array();
        let numerator = numerator.to_array();

        for lane in 0..4 {
            result.push(if range[lane] == 0.0 {
                0.0
            } else {
                numerator[lane] / range[lane]
            });
        }
    }

    for i in (chunks * 4)..len {
        let range = high[i] - low[i];
        result.push(if range == 0.0 {
            0.0
        } else {
            ((close[i] - low[i]) - (high[i] - close[i])) * volume[i] / range
        });
    }

    result
}
