use super::rect::Rect;
use crate::error::{KernelError, KernelResult};
use crate::numeric::Scalar;
use std::ops::Range;

/// Uniform bin grid over the layout box `[xl, xh) x [yl, yh)`.
///
/// Bin `(ix, iy)` is stored at `ix * num_bins_y + iy` in dense maps.
#[derive(Clone, Copy, Debug)]
pub struct BinGrid<T> {
    area: Rect<T>,
    num_bins_x: usize,
    num_bins_y: usize,
    bin_size_x: T,
    bin_size_y: T,
    inv_bin_size_x: T,
    inv_bin_size_y: T,
}

impl<T: Scalar> BinGrid<T> {
    pub fn new(area: Rect<T>, num_bins_x: usize, num_bins_y: usize) -> KernelResult<Self> {
        if num_bins_x == 0 || num_bins_y == 0 {
            return Err(KernelError::violation(
                "num_bins",
                format!("grid needs at least one bin per axis, got {}x{}", num_bins_x, num_bins_y),
            ));
        }
        if num_bins_x.checked_mul(num_bins_y).is_none() {
            return Err(KernelError::violation(
                "num_bins",
                format!("{}x{} bins overflow the map index", num_bins_x, num_bins_y),
            ));
        }
        if !(area.xh > area.xl && area.yh > area.yl) || !area.area().is_finite() {
            return Err(KernelError::violation(
                "layout",
                format!(
                    "layout box ({}, {}) - ({}, {}) must have finite positive extent",
                    area.xl, area.yl, area.xh, area.yh
                ),
            ));
        }

        let bin_size_x = area.width() / T::from_usize(num_bins_x);
        let bin_size_y = area.height() / T::from_usize(num_bins_y);
        Ok(Self {
            area,
            num_bins_x,
            num_bins_y,
            bin_size_x,
            bin_size_y,
            inv_bin_size_x: T::one() / bin_size_x,
            inv_bin_size_y: T::one() / bin_size_y,
        })
    }

    pub fn area(&self) -> &Rect<T> {
        &self.area
    }
    pub fn num_bins_x(&self) -> usize {
        self.num_bins_x
    }
    pub fn num_bins_y(&self) -> usize {
        self.num_bins_y
    }
    pub fn num_bins(&self) -> usize {
        self.num_bins_x * self.num_bins_y
    }
    pub fn bin_size_x(&self) -> T {
        self.bin_size_x
    }
    pub fn bin_size_y(&self) -> T {
        self.bin_size_y
    }

    #[inline(always)]
    pub fn bin_index(&self, ix: usize, iy: usize) -> usize {
        ix * self.num_bins_y + iy
    }

    /// Bins in x touched by `[x_min, x_max]`, clamped into `[0, num_bins_x)`.
    #[inline(always)]
    pub fn bin_range_x(&self, x_min: T, x_max: T) -> Range<usize> {
        clamped_range(
            (x_min - self.area.xl) * self.inv_bin_size_x,
            (x_max - self.area.xl) * self.inv_bin_size_x,
            self.num_bins_x,
        )
    }

    #[inline(always)]
    pub fn bin_range_y(&self, y_min: T, y_max: T) -> Range<usize> {
        clamped_range(
            (y_min - self.area.yl) * self.inv_bin_size_y,
            (y_max - self.area.yl) * self.inv_bin_size_y,
            self.num_bins_y,
        )
    }

    /// Both bin ranges for a box.
    #[inline(always)]
    pub fn bin_ranges(&self, r: &Rect<T>) -> (Range<usize>, Range<usize>) {
        (self.bin_range_x(r.xl, r.xh), self.bin_range_y(r.yl, r.yh))
    }

    #[inline(always)]
    pub fn bin_rect(&self, ix: usize, iy: usize) -> Rect<T> {
        let xl = self.area.xl + T::from_usize(ix) * self.bin_size_x;
        let yl = self.area.yl + T::from_usize(iy) * self.bin_size_y;
        Rect::new(xl, yl, xl + self.bin_size_x, yl + self.bin_size_y)
    }
}

/// `[floor(lo), floor(hi) + 1)` clamped into `[0, n)`. Empty when the box
/// misses the grid; NaN bounds also give an empty range.
#[inline(always)]
fn clamped_range<T: Scalar>(lo: T, hi: T, n: usize) -> Range<usize> {
    let start = to_bin(lo.floor(), n);
    let end = to_bin(hi.floor() + T::one(), n);
    start..end.max(start)
}

#[inline(always)]
fn to_bin<T: Scalar>(v: T, n: usize) -> usize {
    // Float::max/min discard NaN, which lands the value on 0.
    let clamped = v.max(T::zero()).min(T::from_usize(n));
    clamped.to_usize().unwrap_or(0).min(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> BinGrid<f64> {
        BinGrid::new(Rect::new(0.0, 0.0, 10.0, 8.0), 5, 4).unwrap()
    }

    #[test]
    fn bin_sizes_follow_layout() {
        let g = grid();
        assert_eq!(g.bin_size_x(), 2.0);
        assert_eq!(g.bin_size_y(), 2.0);
        assert_eq!(g.bin_index(2, 3), 11);
        assert_eq!(g.bin_rect(1, 2), Rect::new(2.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn range_covers_touched_bins() {
        let g = grid();
        assert_eq!(g.bin_range_x(1.0, 5.0), 0..3);
        assert_eq!(g.bin_range_y(2.5, 3.5), 1..2);
    }

    #[test]
    fn range_is_clamped_to_grid() {
        let g = grid();
        assert_eq!(g.bin_range_x(-3.0, 3.0), 0..2);
        assert_eq!(g.bin_range_x(9.0, 40.0), 4..5);
        assert_eq!(g.bin_range_y(-1e30, 1e30), 0..4);
    }

    #[test]
    fn box_outside_grid_gives_empty_range() {
        let g = grid();
        assert!(g.bin_range_x(12.0, 14.0).is_empty());
        assert!(g.bin_range_x(-6.0, -3.0).is_empty());
        assert!(g.bin_range_y(f64::NAN, f64::NAN).is_empty());
    }

    #[test]
    fn offset_origin_is_respected() {
        let g = BinGrid::new(Rect::new(100.0_f32, -4.0, 104.0, 4.0), 4, 2).unwrap();
        assert_eq!(g.bin_range_x(101.5, 102.5), 1..3);
        assert_eq!(g.bin_range_y(-4.0, -0.5), 0..1);
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(BinGrid::new(Rect::new(0.0, 0.0, 1.0, 1.0), 0, 4).is_err());
        assert!(BinGrid::new(Rect::new(0.0, 0.0, 0.0, 1.0), 2, 4).is_err());
    }

    #[test]
    fn bin_count_overflow_is_rejected() {
        let err = BinGrid::new(Rect::new(0.0, 0.0, 1.0, 1.0), usize::MAX / 2, 3).unwrap_err();
        assert_eq!(err.input(), Some("num_bins"));
    }
}
