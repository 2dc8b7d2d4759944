use super::extent::net_extent;
use gp_common::db::indices::{Axis, NetId};
use gp_common::db::layout::{XyView, XyViewMut};
use gp_common::db::topology::NetTopology;
use gp_common::error::{KernelError, KernelResult, zeroed};
use gp_common::numeric::Scalar;
use gp_common::parallel::{DisjointSlice, WorkerPool};
use gp_common::util::check;
use gp_common::util::profiler::ScopedTimer;
use rayon::prelude::*;

/// Result of a forward pass, kept by the caller until the matching backward.
#[derive(Clone, Debug)]
pub struct WirelengthForward<T> {
    /// Sum of `partial_wl`.
    pub total: T,
    /// Per net wirelength, `[2 * net]` for x and `[2 * net + 1]` for y,
    /// already scaled by the net weight when weights are enabled.
    pub partial_wl: Vec<T>,
    /// d(wirelength)/d(pin position), unweighted, same layout as the pin
    /// position buffer.
    pub grad_intermediate: Vec<T>,
}

impl<T: Scalar> WirelengthForward<T> {
    pub fn net_wirelength(&self, net: NetId) -> (T, T) {
        let n = net.index();
        (self.partial_wl[2 * n], self.partial_wl[2 * n + 1])
    }

    pub fn num_nets(&self) -> usize {
        self.partial_wl.len() / 2
    }
}

/// Weighted-average wirelength of all nets and its gradient w.r.t. pin
/// positions.
///
/// For one net and axis with pins `x_i`:
///
/// ```text
/// WL = sum(x_i * e^((x_i - x_max)/gamma)) / sum(e^((x_i - x_max)/gamma))
///    - sum(x_i * e^((x_min - x_i)/gamma)) / sum(e^((x_min - x_i)/gamma))
/// ```
///
/// Masked nets produce zero wirelength and leave their pins' gradient at
/// zero. Work is split over net-axis pairs.
pub fn weighted_average_forward<T: Scalar>(
    pos: &[T],
    topology: &NetTopology<'_>,
    net_mask: &[u8],
    net_weights: &[T],
    inv_gamma: T,
    pool: &WorkerPool,
) -> KernelResult<WirelengthForward<T>> {
    let view = XyView::new("pos", pos)?;
    pin_count("pos", view.count(), topology)?;
    let num_nets = topology.num_nets();
    check::net_mask(net_mask, num_nets)?;
    check::net_weights(net_weights, num_nets)?;
    check::inv_gamma(inv_gamma)?;

    let _timer = ScopedTimer::new("wa wirelength forward");
    let mut partial_wl = zeroed("partial_wl", 2 * num_nets)?;
    let mut grad_intermediate = zeroed("grad_intermediate", pos.len())?;

    {
        let mut grads = XyViewMut::new("grad_intermediate", &mut grad_intermediate)?;
        let (grad_x, grad_y) = grads.split();
        let grad_x = DisjointSlice::new(grad_x);
        let grad_y = DisjointSlice::new(grad_y);

        let chunk = pool.chunk_size(2 * num_nets);
        pool.install(|| {
            partial_wl
                .par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(c, out)| {
                    for (k, wl) in out.iter_mut().enumerate() {
                        let item = c * chunk + k;
                        let net = NetId::new(item >> 1);
                        if net_mask[net.index()] == 0 {
                            continue;
                        }
                        let (values, grads) = match Axis::of_item(item) {
                            Axis::X => (view.x(), &grad_x),
                            Axis::Y => (view.y(), &grad_y),
                        };
                        // SAFETY: a validated topology gives each pin to one
                        // net, and x and y live in separate halves.
                        *wl = unsafe {
                            net_axis_forward(values, topology.pins(net), inv_gamma, grads)
                        };
                    }
                });

            if !net_weights.is_empty() {
                partial_wl
                    .par_chunks_mut(2)
                    .zip(net_weights.par_iter())
                    .for_each(|(row, &w)| {
                        row[0] *= w;
                        row[1] *= w;
                    });
            }
        });
    }

    let total = partial_wl.iter().copied().sum();
    log::trace!("WA wirelength over {} nets: {}", num_nets, total);
    Ok(WirelengthForward {
        total,
        partial_wl,
        grad_intermediate,
    })
}

/// One net on one axis: returns its smoothed wirelength and writes the
/// gradient of every pin of the net.
///
/// # Safety
/// No other concurrent call may write the gradients of `pins`.
#[inline]
pub(crate) unsafe fn net_axis_forward<T: Scalar>(
    values: &[T],
    pins: &[u32],
    inv_gamma: T,
    grads: &DisjointSlice<'_, T>,
) -> T {
    if pins.is_empty() {
        return T::zero();
    }
    let one = T::one();
    let (x_max, x_min) = net_extent(values, pins);

    let mut xexp_x_sum = T::zero();
    let mut xexp_nx_sum = T::zero();
    let mut exp_x_sum = T::zero();
    let mut exp_nx_sum = T::zero();
    for &pin in pins {
        let xx = values[pin as usize];
        let exp_x = ((xx - x_max) * inv_gamma).exp();
        let exp_nx = ((x_min - xx) * inv_gamma).exp();

        xexp_x_sum += xx * exp_x;
        xexp_nx_sum += xx * exp_nx;
        exp_x_sum += exp_x;
        exp_nx_sum += exp_nx;
    }

    let wa_x = xexp_x_sum / exp_x_sum;
    let wa_nx = xexp_nx_sum / exp_nx_sum;

    // d/dx_i of the two averages is (a + b * x_i) * e_i with
    //   b = inv_gamma / S,  a = (1 - b * sum(x e)) / S
    // which equals (1 + (x_i - wa) * inv_gamma) / S * e_i. The second form
    // keeps a lone pin at exactly zero.
    let inv_exp_x_sum = one / exp_x_sum;
    let inv_exp_nx_sum = one / exp_nx_sum;
    for &pin in pins {
        let p = pin as usize;
        let xx = values[p];
        let exp_x = ((xx - x_max) * inv_gamma).exp();
        let exp_nx = ((x_min - xx) * inv_gamma).exp();

        let coef_x = (one + (xx - wa_x) * inv_gamma) * inv_exp_x_sum;
        let coef_nx = (one - (xx - wa_nx) * inv_gamma) * inv_exp_nx_sum;
        unsafe { grads.write(p, coef_x * exp_x - coef_nx * exp_nx) };
    }

    wa_x - wa_nx
}

pub(crate) fn pin_count(
    input: &'static str,
    count: usize,
    topology: &NetTopology<'_>,
) -> KernelResult<()> {
    if count != topology.num_pins() {
        return Err(KernelError::violation(
            input,
            format!(
                "holds {} pins but the net topology indexes {}",
                count,
                topology.num_pins()
            ),
        ));
    }
    Ok(())
}
