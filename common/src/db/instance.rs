//! Flat-array problem instance, the on-disk form of the kernel inputs.

use crate::geom::rect::Rect;
use crate::numeric::Scalar;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Instance {
    pub xl: f64,
    pub yl: f64,
    pub xh: f64,
    pub yh: f64,
    pub num_bins_x: usize,
    pub num_bins_y: usize,

    pub num_movable_nodes: usize,
    /// x of every node followed by y of every node.
    pub node_pos: Vec<f64>,
    pub node_size_x: Vec<f64>,
    pub node_size_y: Vec<f64>,
    /// `num_bins_x * num_bins_y` values, x-major.
    pub routing_utilization_map: Vec<f64>,

    /// x of every pin followed by y of every pin.
    pub pin_pos: Vec<f64>,
    pub flat_netpin: Vec<u32>,
    pub netpin_start: Vec<u32>,
    pub net_mask: Vec<u8>,
    #[serde(default)]
    pub net_weights: Vec<f64>,
}

impl Instance {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read instance {:?}: {}", path, e))?;
        toml::from_str(&s).map_err(|e| anyhow::anyhow!("Invalid instance TOML in {:?}: {}", path, e))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.node_pos.len() / 2
    }

    pub fn num_pins(&self) -> usize {
        self.pin_pos.len() / 2
    }

    pub fn num_nets(&self) -> usize {
        self.netpin_start.len().saturating_sub(1)
    }

    pub fn layout<T: Scalar>(&self) -> Rect<T> {
        Rect::new(
            T::from_f64(self.xl),
            T::from_f64(self.yl),
            T::from_f64(self.xh),
            T::from_f64(self.yh),
        )
    }
}

/// Converts stored `f64` data to the kernel precision.
pub fn cast<T: Scalar>(values: &[f64]) -> Vec<T> {
    values.iter().map(|&v| T::from_f64(v)).collect()
}
