use clap::{Parser, Subcommand};
use gp_common::db::instance::{Instance, cast};
use gp_common::db::topology::NetTopologyBuf;
use gp_common::numeric::Scalar;
use gp_common::util::config::Config;
use gp_common::util::profiler::ScopedTimer;
use gp_common::util::{generator, logger};
use gp_kernels::{DifferentiableOp, RouteArea, WeightedAverageWirelength};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `kernels.threads` from the config file.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Run the kernels in single precision.
    #[arg(long = "f32")]
    single: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a random instance using the `[generator]` settings.
    Generate {
        #[arg(long, default_value = "inputs/random.toml")]
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Congestion-weighted area of every movable node.
    Area {
        #[arg(long, default_value = "inputs/random.toml")]
        instance: PathBuf,
    },
    /// Weighted-average wirelength and its gradient.
    Wirelength {
        #[arg(long, default_value = "inputs/random.toml")]
        instance: PathBuf,
        #[arg(long)]
        gamma: Option<f64>,
    },
    /// Time repeated forward/backward passes on a generated instance.
    Bench {
        #[arg(long, default_value_t = 20)]
        iterations: usize,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        Config::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };
    if let Some(threads) = args.threads {
        config.kernels.threads = threads;
    }

    match args.command {
        Commands::Generate { output, seed } => {
            if let Some(seed) = seed {
                config.generator.seed = seed;
            }
            let inst = generator::generate_random_instance(
                &config.generator,
                &config.routability,
                config.wirelength.use_net_weights,
            );
            inst.save(&output)?;
            log::info!(
                "Generated: {:?} ({} nodes, {} pins, {} nets)",
                output,
                inst.num_nodes(),
                inst.num_pins(),
                inst.num_nets()
            );
        }
        Commands::Area { instance } => {
            let inst = load_instance(&instance)?;
            if args.single {
                run_area::<f32>(&inst, &config)?;
            } else {
                run_area::<f64>(&inst, &config)?;
            }
        }
        Commands::Wirelength { instance, gamma } => {
            if let Some(gamma) = gamma {
                config.wirelength.gamma = gamma;
            }
            let inst = load_instance(&instance)?;
            if args.single {
                run_wirelength::<f32>(&inst, &config)?;
            } else {
                run_wirelength::<f64>(&inst, &config)?;
            }
        }
        Commands::Bench { iterations } => {
            let inst = generator::generate_random_instance(
                &config.generator,
                &config.routability,
                config.wirelength.use_net_weights,
            );
            if args.single {
                run_bench::<f32>(&inst, &config, iterations)?;
            } else {
                run_bench::<f64>(&inst, &config, iterations)?;
            }
        }
    }

    Ok(())
}

fn load_instance(path: &Path) -> anyhow::Result<Instance> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Instance file missing: {:?}. Did you run 'generate'?",
            path
        ));
    }
    log::info!("Loading instance {:?}", path);
    Instance::load(path)
}

fn build_wirelength_op<T: Scalar>(
    inst: &Instance,
    config: &Config,
) -> anyhow::Result<WeightedAverageWirelength<T>> {
    let topology = NetTopologyBuf::new(
        inst.flat_netpin.clone(),
        inst.netpin_start.clone(),
        inst.num_pins(),
    )?;
    let weights = if config.wirelength.use_net_weights {
        cast::<T>(&inst.net_weights)
    } else {
        Vec::new()
    };
    Ok(WeightedAverageWirelength::new(
        topology,
        inst.net_mask.clone(),
        weights,
        T::from_f64(config.wirelength.gamma),
        config.kernels.threads,
    )?)
}

fn run_area<T: Scalar>(inst: &Instance, config: &Config) -> anyhow::Result<()> {
    log::info!(
        "Computing route area ({}, {} threads, {}x{} bins)",
        T::NAME,
        config.kernels.threads,
        inst.num_bins_x,
        inst.num_bins_y
    );
    let op = RouteArea::<T>::new(
        inst.layout(),
        inst.num_bins_x,
        inst.num_bins_y,
        inst.num_movable_nodes,
        config.kernels.threads,
    )?;
    let area = op.forward(
        &cast::<T>(&inst.node_pos),
        &cast::<T>(&inst.node_size_x),
        &cast::<T>(&inst.node_size_y),
        &cast::<T>(&inst.routing_utilization_map),
    )?;

    let movable = &area[..inst.num_movable_nodes];
    let route_area: T = movable.iter().copied().sum();
    let cell_area: f64 = (0..inst.num_movable_nodes)
        .map(|i| inst.node_size_x[i] * inst.node_size_y[i])
        .sum();
    let max_ratio = (0..inst.num_movable_nodes)
        .map(|i| movable[i].to_f64().unwrap_or(0.0) / (inst.node_size_x[i] * inst.node_size_y[i]))
        .filter(|r| r.is_finite())
        .fold(0.0_f64, f64::max);

    log::info!("Movable cell area:  {:.3}", cell_area);
    log::info!("Route-weighted area: {:.3}", route_area);
    log::info!("Peak route/cell ratio: {:.3}", max_ratio);
    Ok(())
}

fn run_wirelength<T: Scalar>(inst: &Instance, config: &Config) -> anyhow::Result<()> {
    let op = build_wirelength_op::<T>(inst, config)?;
    let pos = cast::<T>(&inst.pin_pos);
    log::info!(
        "Computing WA wirelength ({}, gamma {}, {} nets, {} pins)",
        T::NAME,
        config.wirelength.gamma,
        op.num_nets(),
        op.num_pins()
    );

    let (wl, saved) = DifferentiableOp::forward(&op, &pos)?;
    let grad = DifferentiableOp::backward(&op, T::one(), &saved)?;
    let hpwl = op.hpwl(&pos)?;

    let grad_norm = grad.iter().map(|&g| g * g).sum::<T>().sqrt();
    let gap = if hpwl > T::zero() {
        (hpwl - wl) / hpwl
    } else {
        T::zero()
    };
    log::info!("WA wirelength: {:.4}", wl);
    log::info!("HPWL:          {:.4} (smoothing gap {:.3}%)", hpwl, gap * T::from_f64(100.0));
    log::info!("|grad|:        {:.4}", grad_norm);
    Ok(())
}

fn run_bench<T: Scalar>(inst: &Instance, config: &Config, iterations: usize) -> anyhow::Result<()> {
    let op = build_wirelength_op::<T>(inst, config)?;
    let area_op = RouteArea::<T>::new(
        inst.layout(),
        inst.num_bins_x,
        inst.num_bins_y,
        inst.num_movable_nodes,
        config.kernels.threads,
    )?;
    let pin_pos = cast::<T>(&inst.pin_pos);
    let node_pos = cast::<T>(&inst.node_pos);
    let size_x = cast::<T>(&inst.node_size_x);
    let size_y = cast::<T>(&inst.node_size_y);
    let util = cast::<T>(&inst.routing_utilization_map);

    log::info!(
        "Benchmarking {} iterations ({}, {} threads)",
        iterations,
        T::NAME,
        config.kernels.threads
    );

    let timer = ScopedTimer::new("bench");
    let mut wl = T::zero();
    for _ in 0..iterations {
        let (value, saved) = DifferentiableOp::forward(&op, &pin_pos)?;
        DifferentiableOp::backward(&op, T::one(), &saved)?;
        area_op.forward(&node_pos, &size_x, &size_y, &util)?;
        wl = value;
    }
    let secs = timer.elapsed_secs();
    log::info!(
        "{} iterations in {:.3}s ({:.2} ms/iter), last WL {:.4}",
        iterations,
        secs,
        1e3 * secs / iterations.max(1) as f64,
        wl
    );
    Ok(())
}
