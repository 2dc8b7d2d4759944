use gp_common::numeric::Scalar;

/// True `(max, min)` of one net's pins on one axis.
///
/// These anchor the exponentials of the weighted-average terms so the largest
/// exponent is exactly zero. An empty net returns the seeds unchanged.
#[inline(always)]
pub fn net_extent<T: Scalar>(values: &[T], pins: &[u32]) -> (T, T) {
    let mut x_max = T::stabilizer_max_seed();
    let mut x_min = T::stabilizer_min_seed();
    for &pin in pins {
        let xx = values[pin as usize];
        x_max = x_max.max(xx);
        x_min = x_min.min(xx);
    }
    (x_max, x_min)
}
