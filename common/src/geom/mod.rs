pub mod bin_grid;
pub mod rect;
