//! Synthetic scalar fields for contour tests.
//!
//! Every generator returns a `Vec<f64>` in row-major order: the sample at
//! column `i`, row `j` lives at `j * width + i`, and row 0 is the bottom row
//! of the field.

/// Creates a ramp that increases by one per column: `value = col`.
///
/// Any level strictly between two column indices crosses the grid as a
/// single vertical line.
///
/// # Example
///
/// ```
/// use test_utils::create_linear_ramp_grid;
///
/// let grid = create_linear_ramp_grid(3, 2);
/// assert_eq!(grid, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
/// ```
pub fn create_linear_ramp_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(col as f64);
        }
    }
    data
}

/// Creates the 2×2 saddle cell: high at left-top and right-bottom,
/// low at left-bottom and right-top.
pub fn create_saddle_grid(low: f64, high: f64) -> Vec<f64> {
    // row 0: (0,0) low, (1,0) high; row 1: (0,1) high, (1,1) low
    vec![low, high, high, low]
}

/// Creates a cone peaking at the grid center.
///
/// `value = peak - distance_to_center`, so every level below `peak`
/// traces a (polygonal) circle.
pub fn create_radial_peak_grid(width: usize, height: usize, peak: f64) -> Vec<f64> {
    let center_x = (width as f64 - 1.0) / 2.0;
    let center_y = (height as f64 - 1.0) / 2.0;

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - center_x;
            let dy = row as f64 - center_y;
            data.push(peak - (dx * dx + dy * dy).sqrt());
        }
    }
    data
}

/// Creates a smooth field of overlapping sine waves with hills and valleys.
///
/// Values stay within roughly 0..100, and most levels in that range trace
/// several closed and open lines plus the occasional saddle.
pub fn create_sine_hills_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let fx = col as f64 / width as f64;
            let fy = row as f64 / height as f64;

            let v1 = (fx * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v2 = (fy * std::f64::consts::PI * 4.0).sin() * 20.0;
            let v3 = ((fx + fy) * std::f64::consts::PI * 2.0).sin() * 10.0;

            data.push(50.0 + v1 + v2 + v3);
        }
    }
    data
}

/// Creates a deterministic pseudo-random field in `[0, 100)`.
///
/// Same seed, same data.
pub fn create_noise_grid(width: usize, height: usize, seed: u32) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push((hash % 10_000) as f64 / 100.0);
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a linear ramp with one full row replaced by `missing`.
pub fn create_grid_with_missing_row(width: usize, height: usize, row: usize, missing: f64) -> Vec<f64> {
    let mut data = create_linear_ramp_grid(width, height);
    if row < height {
        data[row * width..(row + 1) * width].fill(missing);
    }
    data
}

/// Sets the given `(col, row)` positions of `data` to NaN.
pub fn punch_nans(data: &mut [f64], width: usize, positions: &[(usize, usize)]) {
    for &(col, row) in positions {
        if let Some(v) = data.get_mut(row * width + col) {
            *v = f64::NAN;
        }
    }
}

/// Bilinear interpolation of a unit-lattice grid at `(x, y)`.
///
/// Returns `None` outside the grid.
pub fn bilinear_sample(data: &[f64], width: usize, height: usize, x: f64, y: f64) -> Option<f64> {
    if width < 2 || height < 2 || x < 0.0 || y < 0.0 {
        return None;
    }
    if x > (width - 1) as f64 || y > (height - 1) as f64 {
        return None;
    }

    let i = (x.floor() as usize).min(width - 2);
    let j = (y.floor() as usize).min(height - 2);
    let tx = x - i as f64;
    let ty = y - j as f64;

    let v00 = data[j * width + i];
    let v10 = data[j * width + i + 1];
    let v01 = data[(j + 1) * width + i];
    let v11 = data[(j + 1) * width + i + 1];

    let bottom = v00 + tx * (v10 - v00);
    let top = v01 + tx * (v11 - v01);
    Some(bottom + ty * (top - bottom))
}
