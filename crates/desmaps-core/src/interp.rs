//! Sample grids and piecewise-linear interpolation
//!
//! Interpolation clamps to the edge values outside the abscissa range; it
//! never extrapolates.

/// `n` evenly spaced values over the closed interval `[start, stop]`.
///
/// The last value is exactly `stop`. `n == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// Linearly interpolate the table `(xp, fp)` at `x`.
///
/// `xp` must be ascending and the same length as `fp`. Points left of
/// `xp[0]` take `fp[0]`, points right of the last abscissa take the last
/// ordinate. An empty table yields NaN, as does a NaN `x`.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len(), "xp and fp must have same length");

    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // First abscissa strictly greater than x; guaranteed in 1..n here
    let hi = xp[..n].partition_point(|&v| v <= x);
    let lo = hi - 1;

    let dx = xp[hi] - xp[lo];
    if dx == 0.0 {
        return fp[hi];
    }
    let t = (x - xp[lo]) / dx;
    fp[lo] + t * (fp[hi] - fp[lo])
}

/// Interpolate the table `(xp, fp)` at every point of `x`
pub fn interp_batch(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| interp(xi, xp, fp)).collect()
}
