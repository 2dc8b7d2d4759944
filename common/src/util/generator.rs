use crate::db::instance::Instance;
use crate::util::config::{GeneratorConfig, RoutabilityConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a random placement snapshot: nodes scattered over a square die,
/// nets of random degree over fresh pins, and a noisy utilization map.
///
/// Pins are numbered net by net, so every pin belongs to exactly one net.
pub fn generate_random_instance(
    params: &GeneratorConfig,
    grid: &RoutabilityConfig,
    with_weights: bool,
) -> Instance {
    let mut rng = StdRng::seed_from_u64(params.seed);

    let num_nodes = params.num_nodes.max(1);
    let num_movable = ((num_nodes as f64) * params.movable_fraction.clamp(0.0, 1.0)) as usize;
    let die = params.die_size.max(1.0);

    let cell_w = die / 200.0;
    let cell_h = die / 100.0;

    log::info!(
        "Generating instance: {} nodes ({} movable), {} nets, die {:.1}x{:.1}",
        num_nodes,
        num_movable,
        params.num_nets,
        die,
        die
    );

    let mut node_x = Vec::with_capacity(num_nodes);
    let mut node_y = Vec::with_capacity(num_nodes);
    let mut node_size_x = Vec::with_capacity(num_nodes);
    let mut node_size_y = Vec::with_capacity(num_nodes);
    for i in 0..num_nodes {
        // fixed nodes are macros, a few times larger than cells
        let scale = if i < num_movable {
            rng.gen_range(1.0..4.0)
        } else {
            rng.gen_range(4.0..12.0)
        };
        let w = cell_w * scale;
        let h = cell_h;
        node_x.push(rng.gen_range(0.0..(die - w).max(f64::EPSILON)));
        node_y.push(rng.gen_range(0.0..(die - h).max(f64::EPSILON)));
        node_size_x.push(w);
        node_size_y.push(h);
    }

    let max_degree = params.max_degree.max(1);
    let mut pin_x = Vec::new();
    let mut pin_y = Vec::new();
    let mut flat_netpin = Vec::new();
    let mut netpin_start = Vec::with_capacity(params.num_nets + 1);
    let mut net_mask = Vec::with_capacity(params.num_nets);
    netpin_start.push(0u32);
    for _ in 0..params.num_nets {
        let degree = rng.gen_range(1..=max_degree);
        for _ in 0..degree {
            let node = rng.gen_range(0..num_nodes);
            let pin = pin_x.len() as u32;
            pin_x.push(node_x[node] + rng.gen_range(0.0..=node_size_x[node]));
            pin_y.push(node_y[node] + rng.gen_range(0.0..=node_size_y[node]));
            flat_netpin.push(pin);
        }
        netpin_start.push(flat_netpin.len() as u32);
        net_mask.push(u8::from(!rng.gen_bool(params.masked_fraction.clamp(0.0, 1.0))));
    }

    let net_weights = if with_weights {
        (0..params.num_nets).map(|_| rng.gen_range(0.5..2.0)).collect()
    } else {
        Vec::new()
    };

    let num_bins = grid.num_bins_x.max(1) * grid.num_bins_y.max(1);
    let routing_utilization_map = (0..num_bins).map(|_| rng.gen_range(0.2..1.5)).collect();

    node_x.extend(node_y);
    pin_x.extend(pin_y);

    Instance {
        xl: 0.0,
        yl: 0.0,
        xh: die,
        yh: die,
        num_bins_x: grid.num_bins_x.max(1),
        num_bins_y: grid.num_bins_y.max(1),
        num_movable_nodes: num_movable,
        node_pos: node_x,
        node_size_x,
        node_size_y,
        routing_utilization_map,
        pin_pos: pin_x,
        flat_netpin,
        netpin_start,
        net_mask,
        net_weights,
    }
}
