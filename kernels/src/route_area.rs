use gp_common::db::layout::XyView;
use gp_common::error::{KernelResult, zeroed};
use gp_common::geom::bin_grid::BinGrid;
use gp_common::geom::rect::Rect;
use gp_common::numeric::Scalar;
use gp_common::parallel::WorkerPool;
use gp_common::util::check;
use gp_common::util::profiler::ScopedTimer;
use rayon::prelude::*;

/// Utilization-weighted overlap between each movable node and the routing
/// bins it covers.
///
/// `pos` holds all node x values followed by all y values; nodes are
/// boxes `[x, x + w] x [y, y + h]`. The result has one entry per node. Only
/// `[0, num_movable_nodes)` is computed; the remaining entries are left at
/// zero and carry no meaning.
pub fn compute_instance_route_area<T: Scalar>(
    pos: &[T],
    node_size_x: &[T],
    node_size_y: &[T],
    routing_utilization_map: &[T],
    grid: &BinGrid<T>,
    num_movable_nodes: usize,
    pool: &WorkerPool,
) -> KernelResult<Vec<T>> {
    let pos = XyView::new("pos", pos)?;
    let num_nodes = pos.count();
    check::length("node_size_x", node_size_x.len(), num_nodes)?;
    check::length("node_size_y", node_size_y.len(), num_nodes)?;
    check::length(
        "routing_utilization_map",
        routing_utilization_map.len(),
        grid.num_bins(),
    )?;
    check::movable_range(num_movable_nodes, num_nodes)?;

    let _timer = ScopedTimer::new("instance route area");
    let mut instance_route_area = zeroed("instance_route_area", num_nodes)?;

    let chunk = pool.chunk_size(num_movable_nodes);
    let (xs, ys) = (pos.x(), pos.y());
    pool.install(|| {
        instance_route_area[..num_movable_nodes]
            .par_chunks_mut(chunk)
            .enumerate()
            .for_each(|(c, out)| {
                let base = c * chunk;
                for (k, area) in out.iter_mut().enumerate() {
                    let i = base + k;
                    let node =
                        Rect::from_origin_size(xs[i], ys[i], node_size_x[i], node_size_y[i]);
                    *area = node_route_area(&node, grid, routing_utilization_map);
                }
            });
    });

    log::trace!(
        "Route area computed for {} of {} nodes on a {}x{} grid",
        num_movable_nodes,
        num_nodes,
        grid.num_bins_x(),
        grid.num_bins_y()
    );
    Ok(instance_route_area)
}

/// Overlap of one box with the grid, each bin weighted by its utilization.
#[inline]
pub fn node_route_area<T: Scalar>(node: &Rect<T>, grid: &BinGrid<T>, utilization: &[T]) -> T {
    let (bins_x, bins_y) = grid.bin_ranges(node);
    let mut area = T::zero();
    for ix in bins_x {
        for iy in bins_y.clone() {
            let overlap = node.overlap_area(&grid.bin_rect(ix, iy));
            area += overlap * utilization[grid.bin_index(ix, iy)];
        }
    }
    area
}

/// Route area evaluation bound to one grid and movable range.
#[derive(Debug)]
pub struct RouteArea<T> {
    grid: BinGrid<T>,
    num_movable_nodes: usize,
    pool: WorkerPool,
}

impl<T: Scalar> RouteArea<T> {
    /// `num_bins_x`/`num_bins_y` shape the grid; `num_movable_nodes` only
    /// bounds the node range.
    pub fn new(
        layout: Rect<T>,
        num_bins_x: usize,
        num_bins_y: usize,
        num_movable_nodes: usize,
        threads: usize,
    ) -> KernelResult<Self> {
        Ok(Self {
            grid: BinGrid::new(layout, num_bins_x, num_bins_y)?,
            num_movable_nodes,
            pool: WorkerPool::new(threads)?,
        })
    }

    pub fn forward(
        &self,
        pos: &[T],
        node_size_x: &[T],
        node_size_y: &[T],
        routing_utilization_map: &[T],
    ) -> KernelResult<Vec<T>> {
        compute_instance_route_area(
            pos,
            node_size_x,
            node_size_y,
            routing_utilization_map,
            &self.grid,
            self.num_movable_nodes,
            &self.pool,
        )
    }
}
