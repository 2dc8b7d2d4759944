//! Views over the split position convention: one contiguous buffer of
//! length `2 * count`, x values in `[0, count)`, y values in `[count, 2 * count)`.

use crate::error::KernelResult;
use crate::util::check;

#[derive(Clone, Copy, Debug)]
pub struct XyView<'a, T> {
    x: &'a [T],
    y: &'a [T],
}

impl<'a, T> XyView<'a, T> {
    pub fn new(input: &'static str, buf: &'a [T]) -> KernelResult<Self> {
        check::even_length(input, buf.len())?;
        let (x, y) = buf.split_at(buf.len() / 2);
        Ok(Self { x, y })
    }

    /// Number of entities (half the buffer length).
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.x.len()
    }

    #[inline(always)]
    pub fn x(&self) -> &'a [T] {
        self.x
    }

    #[inline(always)]
    pub fn y(&self) -> &'a [T] {
        self.y
    }
}

#[derive(Debug)]
pub struct XyViewMut<'a, T> {
    x: &'a mut [T],
    y: &'a mut [T],
}

impl<'a, T> XyViewMut<'a, T> {
    pub fn new(input: &'static str, buf: &'a mut [T]) -> KernelResult<Self> {
        check::even_length(input, buf.len())?;
        let half = buf.len() / 2;
        let (x, y) = buf.split_at_mut(half);
        Ok(Self { x, y })
    }

    #[inline(always)]
    pub fn count(&self) -> usize {
        self.x.len()
    }

    /// Both halves at once, for kernels that write x and y in the same pass.
    pub fn split(&mut self) -> (&mut [T], &mut [T]) {
        (&mut *self.x, &mut *self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_do_not_overlap() {
        let buf = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let view = XyView::new("pos", &buf).unwrap();
        assert_eq!(view.count(), 3);
        assert_eq!(view.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(view.y(), &[10.0, 11.0, 12.0]);
    }

    #[test]
    fn odd_buffer_is_rejected() {
        let buf = [0.0_f64; 5];
        let err = XyView::new("pos", &buf).unwrap_err();
        assert_eq!(err.input(), Some("pos"));
    }

    #[test]
    fn mutable_halves_write_through() {
        let mut buf = vec![0.0_f32; 4];
        {
            let mut view = XyViewMut::new("grad", &mut buf).unwrap();
            let (x, y) = view.split();
            x[1] = 1.0;
            y[0] = 2.0;
        }
        assert_eq!(buf, vec![0.0, 1.0, 2.0, 0.0]);
    }
}
