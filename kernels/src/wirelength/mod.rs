pub mod backward;
pub mod extent;
pub mod forward;
pub mod hpwl;

pub use backward::{integrate_net_weights, weighted_average_backward};
pub use forward::{WirelengthForward, weighted_average_forward};
pub use hpwl::half_perimeter_wirelength;

use gp_common::db::topology::NetTopologyBuf;
use gp_common::error::{KernelError, KernelResult};
use gp_common::numeric::Scalar;
use gp_common::parallel::WorkerPool;
use gp_common::util::check;

/// Weighted-average wirelength over a fixed netlist.
///
/// Holds the net topology, mask, optional weights and smoothing parameter;
/// positions and upstream gradients come in per call.
#[derive(Debug)]
pub struct WeightedAverageWirelength<T> {
    topology: NetTopologyBuf,
    net_mask: Vec<u8>,
    net_weights: Vec<T>,
    inv_gamma: T,
    pool: WorkerPool,
}

impl<T: Scalar> WeightedAverageWirelength<T> {
    /// `net_weights` may be empty to disable weighting.
    pub fn new(
        topology: NetTopologyBuf,
        net_mask: Vec<u8>,
        net_weights: Vec<T>,
        gamma: T,
        threads: usize,
    ) -> KernelResult<Self> {
        check::net_mask(&net_mask, topology.num_nets())?;
        check::net_weights(&net_weights, topology.num_nets())?;
        let inv_gamma = inverse_gamma(gamma)?;
        log::debug!(
            "WA wirelength op: {} nets, {} pins, gamma {}, weights {}",
            topology.num_nets(),
            topology.num_pins(),
            gamma,
            if net_weights.is_empty() { "off" } else { "on" }
        );
        Ok(Self {
            topology,
            net_mask,
            net_weights,
            inv_gamma,
            pool: WorkerPool::new(threads)?,
        })
    }

    pub fn inv_gamma(&self) -> T {
        self.inv_gamma
    }

    /// Updates the smoothing coefficient between iterations.
    pub fn set_gamma(&mut self, gamma: T) -> KernelResult<()> {
        self.inv_gamma = inverse_gamma(gamma)?;
        Ok(())
    }

    pub fn num_nets(&self) -> usize {
        self.topology.num_nets()
    }

    pub fn num_pins(&self) -> usize {
        self.topology.num_pins()
    }

    pub fn forward(&self, pos: &[T]) -> KernelResult<WirelengthForward<T>> {
        weighted_average_forward(
            pos,
            &self.topology.view(),
            &self.net_mask,
            &self.net_weights,
            self.inv_gamma,
            &self.pool,
        )
    }

    pub fn backward(&self, grad_upstream: T, saved: &WirelengthForward<T>) -> KernelResult<Vec<T>> {
        if saved.num_nets() != self.num_nets() {
            return Err(KernelError::violation(
                "partial_wl",
                format!(
                    "saved forward covers {} nets, op has {}",
                    saved.num_nets(),
                    self.num_nets()
                ),
            ));
        }
        weighted_average_backward(
            grad_upstream,
            &saved.grad_intermediate,
            &self.topology.view(),
            &self.net_mask,
            &self.net_weights,
            &self.pool,
        )
    }

    pub fn hpwl(&self, pos: &[T]) -> KernelResult<T> {
        half_perimeter_wirelength(
            pos,
            &self.topology.view(),
            &self.net_mask,
            &self.net_weights,
            &self.pool,
        )
    }
}

fn inverse_gamma<T: Scalar>(gamma: T) -> KernelResult<T> {
    if !(gamma.is_finite() && gamma > T::zero()) {
        return Err(KernelError::violation(
            "gamma",
            format!("must be finite and positive, got {}", gamma),
        ));
    }
    let inv_gamma = T::one() / gamma;
    check::inv_gamma(inv_gamma)?;
    Ok(inv_gamma)
}
