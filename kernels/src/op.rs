use crate::wirelength::{WeightedAverageWirelength, WirelengthForward};
use gp_common::error::KernelResult;
use gp_common::numeric::Scalar;

/// Two-phase cost term driven by an external autodiff loop.
///
/// `forward` evaluates the cost for one position snapshot and returns the
/// state `backward` needs; `backward` turns the upstream gradient of the
/// scalar cost into a gradient over the position buffer. No state survives
/// between calls other than what the caller keeps in `Saved`.
pub trait DifferentiableOp<T: Scalar> {
    type Saved;

    fn forward(&self, pos: &[T]) -> KernelResult<(T, Self::Saved)>;
    fn backward(&self, grad_upstream: T, saved: &Self::Saved) -> KernelResult<Vec<T>>;
}

impl<T: Scalar> DifferentiableOp<T> for WeightedAverageWirelength<T> {
    type Saved = WirelengthForward<T>;

    fn forward(&self, pos: &[T]) -> KernelResult<(T, Self::Saved)> {
        let saved = WeightedAverageWirelength::forward(self, pos)?;
        Ok((saved.total, saved))
    }

    fn backward(&self, grad_upstream: T, saved: &Self::Saved) -> KernelResult<Vec<T>> {
        WeightedAverageWirelength::backward(self, grad_upstream, saved)
    }
}
