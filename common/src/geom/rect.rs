use crate::numeric::Scalar;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect<T> {
    pub xl: T,
    pub yl: T,
    pub xh: T,
    pub yh: T,
}

impl<T: Scalar> Rect<T> {
    pub fn new(xl: T, yl: T, xh: T, yh: T) -> Self {
        Self { xl, yl, xh, yh }
    }

    /// Box of a node placed with its lower-left corner at `(x, y)`.
    #[inline(always)]
    pub fn from_origin_size(x: T, y: T, w: T, h: T) -> Self {
        Self {
            xl: x,
            yl: y,
            xh: x + w,
            yh: y + h,
        }
    }

    pub fn width(&self) -> T {
        self.xh - self.xl
    }
    pub fn height(&self) -> T {
        self.yh - self.yl
    }
    pub fn area(&self) -> T {
        self.width() * self.height()
    }

    /// Area shared with `other`; zero when the boxes are disjoint.
    #[inline(always)]
    pub fn overlap_area(&self, other: &Rect<T>) -> T {
        let zero = T::zero();
        let dx = (self.xh.min(other.xh) - self.xl.max(other.xl)).max(zero);
        let dy = (self.yh.min(other.yh) - self.yl.max(other.yl)).max(zero);
        dx * dy
    }
}
