pub mod db;
pub mod error;
pub mod geom;
pub mod numeric;
pub mod parallel;
pub mod util;
