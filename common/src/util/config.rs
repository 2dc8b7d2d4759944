use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub kernels: KernelConfig,
    #[serde(default)]
    pub wirelength: WirelengthConfig,
    #[serde(default)]
    pub routability: RoutabilityConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kernels: KernelConfig::default(),
            wirelength: WirelengthConfig::default(),
            routability: RoutabilityConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct KernelConfig {
    /// Worker pool size for the parallel phases; 0 runs single-threaded.
    #[serde(default = "default_threads")]
    pub threads: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct WirelengthConfig {
    #[serde(default = "default_wa_gamma")]
    pub gamma: f64,
    #[serde(default = "default_use_net_weights")]
    pub use_net_weights: bool,
}

impl Default for WirelengthConfig {
    fn default() -> Self {
        Self {
            gamma: default_wa_gamma(),
            use_net_weights: default_use_net_weights(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct RoutabilityConfig {
    #[serde(default = "default_num_bins")]
    pub num_bins_x: usize,
    #[serde(default = "default_num_bins")]
    pub num_bins_y: usize,
}

impl Default for RoutabilityConfig {
    fn default() -> Self {
        Self {
            num_bins_x: default_num_bins(),
            num_bins_y: default_num_bins(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct GeneratorConfig {
    #[serde(default = "default_num_nodes")]
    pub num_nodes: usize,
    #[serde(default = "default_movable_fraction")]
    pub movable_fraction: f64,
    #[serde(default = "default_num_nets")]
    pub num_nets: usize,
    #[serde(default = "default_max_degree")]
    pub max_degree: usize,
    #[serde(default = "default_die_size")]
    pub die_size: f64,
    #[serde(default = "default_masked_fraction")]
    pub masked_fraction: f64,
    #[serde(default)]
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_nodes: default_num_nodes(),
            movable_fraction: default_movable_fraction(),
            num_nets: default_num_nets(),
            max_degree: default_max_degree(),
            die_size: default_die_size(),
            masked_fraction: default_masked_fraction(),
            seed: 0,
        }
    }
}

fn default_threads() -> usize {
    0
}

fn default_wa_gamma() -> f64 {
    4.0
}

fn default_use_net_weights() -> bool {
    true
}

fn default_num_bins() -> usize {
    64
}

fn default_num_nodes() -> usize {
    10_000
}

fn default_movable_fraction() -> f64 {
    0.9
}

fn default_num_nets() -> usize {
    10_000
}

fn default_max_degree() -> usize {
    8
}

fn default_die_size() -> f64 {
    1000.0
}

fn default_masked_fraction() -> f64 {
    0.02
}
