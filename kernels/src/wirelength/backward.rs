use super::forward::pin_count;
use gp_common::db::indices::NetId;
use gp_common::db::layout::XyViewMut;
use gp_common::db::topology::NetTopology;
use gp_common::error::{KernelResult, zeroed};
use gp_common::numeric::Scalar;
use gp_common::parallel::{DisjointSlice, WorkerPool};
use gp_common::util::check;
use gp_common::util::profiler::ScopedTimer;
use rayon::prelude::*;

/// Final pin gradient from the forward pass' intermediate buffer.
///
/// Returns a new buffer `grad_intermediate * grad_upstream`, then scales
/// every pin of an unmasked net by that net's weight when weights are given.
/// `grad_intermediate` is not modified.
pub fn weighted_average_backward<T: Scalar>(
    grad_upstream: T,
    grad_intermediate: &[T],
    topology: &NetTopology<'_>,
    net_mask: &[u8],
    net_weights: &[T],
    pool: &WorkerPool,
) -> KernelResult<Vec<T>> {
    check::even_length("grad_intermediate", grad_intermediate.len())?;
    pin_count("grad_intermediate", grad_intermediate.len() / 2, topology)?;
    check::net_mask(net_mask, topology.num_nets())?;
    check::net_weights(net_weights, topology.num_nets())?;

    let _timer = ScopedTimer::new("wa wirelength backward");
    let mut grad_out = zeroed("grad_out", grad_intermediate.len())?;
    scale_gradient(&mut grad_out, grad_intermediate, grad_upstream, pool);

    if !net_weights.is_empty() {
        integrate_net_weights(&mut grad_out, topology, net_mask, net_weights, pool)?;
    }
    Ok(grad_out)
}

/// `out[i] = grad_intermediate[i] * grad_upstream`.
pub fn scale_gradient<T: Scalar>(
    out: &mut [T],
    grad_intermediate: &[T],
    grad_upstream: T,
    pool: &WorkerPool,
) {
    let chunk = pool.chunk_size(out.len());
    pool.install(|| {
        out.par_iter_mut()
            .zip(grad_intermediate.par_iter())
            .with_min_len(chunk)
            .for_each(|(o, &g)| *o = g * grad_upstream);
    });
}

/// Scales, in place, the x and y gradient of every pin of each unmasked net
/// by the net's weight. Does nothing when `net_weights` is empty.
pub fn integrate_net_weights<T: Scalar>(
    grad: &mut [T],
    topology: &NetTopology<'_>,
    net_mask: &[u8],
    net_weights: &[T],
    pool: &WorkerPool,
) -> KernelResult<()> {
    let num_nets = topology.num_nets();
    check::net_mask(net_mask, num_nets)?;
    check::net_weights(net_weights, num_nets)?;
    if net_weights.is_empty() {
        return Ok(());
    }

    let mut grads = XyViewMut::new("grad", grad)?;
    pin_count("grad", grads.count(), topology)?;
    let (grad_x, grad_y) = grads.split();
    let grad_x = DisjointSlice::new(grad_x);
    let grad_y = DisjointSlice::new(grad_y);

    let chunk = pool.chunk_size(num_nets);
    pool.install(|| {
        (0..num_nets)
            .into_par_iter()
            .with_min_len(chunk)
            .for_each(|n| {
                if net_mask[n] == 0 {
                    return;
                }
                let weight = net_weights[n];
                for &pin in topology.pins(NetId::new(n)) {
                    let p = pin as usize;
                    // SAFETY: pins are owned by exactly one net.
                    unsafe {
                        grad_x.update(p, |g| *g *= weight);
                        grad_y.update(p, |g| *g *= weight);
                    }
                }
            });
    });
    Ok(())
}
