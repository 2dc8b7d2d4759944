//! Differentiable cost kernels for analytical global placement: congestion
//! weighted cell area and weighted-average (WA) wirelength with its gradient.

pub mod op;
pub mod route_area;
pub mod wirelength;

pub use op::DifferentiableOp;
pub use route_area::{RouteArea, compute_instance_route_area};
pub use wirelength::WeightedAverageWirelength;
