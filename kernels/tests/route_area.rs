use approx::assert_relative_eq;
use gp_common::db::instance::{Instance, cast};
use gp_common::geom::bin_grid::BinGrid;
use gp_common::geom::rect::Rect;
use gp_common::parallel::WorkerPool;
use gp_common::util::config::{GeneratorConfig, RoutabilityConfig};
use gp_common::util::generator::generate_random_instance;
use gp_kernels::{RouteArea, compute_instance_route_area};

fn instance(seed: u64) -> Instance {
    let params = GeneratorConfig {
        num_nodes: 500,
        num_nets: 10,
        die_size: 200.0,
        seed,
        ..Default::default()
    };
    let grid = RoutabilityConfig {
        num_bins_x: 16,
        num_bins_y: 12,
    };
    generate_random_instance(&params, &grid, false)
}

#[test]
fn area_is_bounded_by_footprint_times_peak_utilization() {
    let inst = instance(1);
    let op = RouteArea::new(
        inst.layout(),
        inst.num_bins_x,
        inst.num_bins_y,
        inst.num_movable_nodes,
        4,
    )
    .unwrap();
    let area = op
        .forward(
            &inst.node_pos,
            &inst.node_size_x,
            &inst.node_size_y,
            &inst.routing_utilization_map,
        )
        .unwrap();
    let peak = inst
        .routing_utilization_map
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);
    assert_eq!(area.len(), inst.num_nodes());
    for i in 0..inst.num_movable_nodes {
        let footprint = inst.node_size_x[i] * inst.node_size_y[i];
        assert!(area[i] >= 0.0);
        assert!(area[i] <= footprint * peak * (1.0 + 1e-12));
    }
}

#[test]
fn unit_utilization_reproduces_cell_area() {
    let inst = instance(2);
    let grid = BinGrid::new(inst.layout(), inst.num_bins_x, inst.num_bins_y).unwrap();
    let ones = vec![1.0; grid.num_bins()];
    let pool = WorkerPool::new(3).unwrap();
    let area = compute_instance_route_area(
        &inst.node_pos,
        &inst.node_size_x,
        &inst.node_size_y,
        &ones,
        &grid,
        inst.num_movable_nodes,
        &pool,
    )
    .unwrap();
    // the generator keeps every node inside the die
    for i in 0..inst.num_movable_nodes {
        assert_relative_eq!(
            area[i],
            inst.node_size_x[i] * inst.node_size_y[i],
            max_relative = 1e-12
        );
    }
}

#[test]
fn partially_outside_node_is_clipped() {
    let grid = BinGrid::new(Rect::new(0.0, 0.0, 10.0, 10.0), 5, 5).unwrap();
    let util = vec![1.0; 25];
    let pool = WorkerPool::single().unwrap();
    // x: [-2, 3] and [9, 12]; y: [8, 11] and [-1, 1]
    let pos = [-2.0, 9.0, 8.0, -1.0];
    let size_x = [5.0, 3.0];
    let size_y = [3.0, 2.0];
    let area =
        compute_instance_route_area(&pos, &size_x, &size_y, &util, &grid, 2, &pool).unwrap();
    assert_eq!(area, vec![3.0 * 2.0, 1.0 * 1.0]);
}

#[test]
fn thread_count_does_not_change_area() {
    let inst = instance(3);
    let grid = BinGrid::new(inst.layout(), inst.num_bins_x, inst.num_bins_y).unwrap();
    let run = |threads| {
        compute_instance_route_area(
            &inst.node_pos,
            &inst.node_size_x,
            &inst.node_size_y,
            &inst.routing_utilization_map,
            &grid,
            inst.num_movable_nodes,
            &WorkerPool::new(threads).unwrap(),
        )
        .unwrap()
    };
    assert_eq!(run(1), run(6));
}

#[test]
fn single_precision_tracks_double_precision() {
    let inst = instance(4);
    let area64 = {
        let grid = BinGrid::new(inst.layout::<f64>(), inst.num_bins_x, inst.num_bins_y).unwrap();
        compute_instance_route_area(
            &inst.node_pos,
            &inst.node_size_x,
            &inst.node_size_y,
            &inst.routing_utilization_map,
            &grid,
            inst.num_movable_nodes,
            &WorkerPool::single().unwrap(),
        )
        .unwrap()
    };
    let area32 = {
        let grid = BinGrid::new(inst.layout::<f32>(), inst.num_bins_x, inst.num_bins_y).unwrap();
        compute_instance_route_area(
            &cast::<f32>(&inst.node_pos),
            &cast::<f32>(&inst.node_size_x),
            &cast::<f32>(&inst.node_size_y),
            &cast::<f32>(&inst.routing_utilization_map),
            &grid,
            inst.num_movable_nodes,
            &WorkerPool::single().unwrap(),
        )
        .unwrap()
    };
    for i in 0..inst.num_movable_nodes {
        assert_relative_eq!(area32[i] as f64, area64[i], max_relative = 1e-3, epsilon = 1e-3);
    }
}
