/// Piecewise-linear interpolation of `ys` sampled at strictly increasing
/// `xs`. Exact at the knots, `None` outside `[xs[0], xs[last]]`, and `None`
/// wherever a bracketing sample is missing.
pub fn interpolate(xs: &[i32], ys: &[Option<f64>], x: i32) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    let (first, last) = (*xs.first()?, *xs.last()?);
    if x < first || x > last {
        return None;
    }
    if let Some(k) = xs.iter().position(|&k| k == x) {
        return ys[k];
    }
    let k = xs.windows(2).position(|w| w[0] < x && x < w[1])?;
    let (x0, x1) = (xs[k] as f64, xs[k + 1] as f64);
    let (y0, y1) = (ys[k]?, ys[k + 1]?);
    Some(y0 + (y1 - y0) * (x as f64 - x0) / (x1 - x0))
}

/// One value per year from the first to the last sample year.
pub fn annual(xs: &[i32], ys: &[Option<f64>]) -> Vec<Option<f64>> {
    match (xs.first(), xs.last()) {
        (Some(&a), Some(&b)) => (a..=b).map(|x| interpolate(xs, ys, x)).collect(),
        _ => Vec::new(),
    }
}
