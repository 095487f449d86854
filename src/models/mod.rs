//! Domain model types for the capacitated vehicle routing problem.
//!
//! Provides per-node demands, routes as ordered node sequences carrying
//! their own load and cost, and solutions as ordered route collections.

mod demand;
mod route;
mod solution;

pub use demand::DemandTable;
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};

/// Node id of the depot. Every route starts and ends here.
pub const DEPOT: usize = 0;
