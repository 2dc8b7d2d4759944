use super::extent::net_extent;
use super::forward::pin_count;
use gp_common::db::indices::NetId;
use gp_common::db::layout::XyView;
use gp_common::db::topology::NetTopology;
use gp_common::error::KernelResult;
use gp_common::numeric::Scalar;
use gp_common::parallel::WorkerPool;
use gp_common::util::check;
use rayon::prelude::*;

/// Exact half-perimeter wirelength, the limit of the WA model as gamma
/// goes to zero. Honors the same mask and weights as the smooth kernel.
pub fn half_perimeter_wirelength<T: Scalar>(
    pos: &[T],
    topology: &NetTopology<'_>,
    net_mask: &[u8],
    net_weights: &[T],
    pool: &WorkerPool,
) -> KernelResult<T> {
    let view = XyView::new("pos", pos)?;
    pin_count("pos", view.count(), topology)?;
    let num_nets = topology.num_nets();
    check::net_mask(net_mask, num_nets)?;
    check::net_weights(net_weights, num_nets)?;

    let chunk = pool.chunk_size(num_nets);
    let partial: Vec<T> = pool.install(|| {
        (0..num_nets)
            .into_par_iter()
            .with_min_len(chunk)
            .map(|n| {
                let pins = topology.pins(NetId::new(n));
                if net_mask[n] == 0 || pins.is_empty() {
                    return T::zero();
                }
                let (x_max, x_min) = net_extent(view.x(), pins);
                let (y_max, y_min) = net_extent(view.y(), pins);
                let wl = (x_max - x_min) + (y_max - y_min);
                match net_weights.get(n) {
                    Some(&w) => wl * w,
                    None => wl,
                }
            })
            .collect()
    });
    Ok(partial.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_per_net() {
        let pool = WorkerPool::single().unwrap();
        let flat = [0, 1, 2, 3, 4];
        let start = [0, 2, 5];
        let topo = NetTopology::new(&flat, &start, 5).unwrap();
        let pos = [0.0, 2.0, 1.0, 1.0, 3.0, 0.0, 0.0, 4.0, 1.0, 2.0];
        let hpwl = half_perimeter_wirelength(&pos, &topo, &[1, 1], &[], &pool).unwrap();
        assert_eq!(hpwl, 2.0 + 0.0 + 2.0 + 3.0);
        let masked = half_perimeter_wirelength(&pos, &topo, &[0, 1], &[], &pool).unwrap();
        assert_eq!(masked, 5.0);
        let weighted = half_perimeter_wirelength(&pos, &topo, &[1, 1], &[2.0, 1.0], &pool).unwrap();
        assert_eq!(weighted, 9.0);
    }
}
