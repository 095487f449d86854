//! Constructive heuristics for building initial CVRP solutions.
//!
//! - [`SavingsList`] — Clarke-Wright savings of every customer pair, in processing order
//! - [`ClarkeWrightSolver`] — Clarke-Wright savings algorithm (1964), O(n³) worst case

mod clarke_wright;
mod config;
mod savings;

pub use clarke_wright::{
    clarke_wright_savings, ClarkeWrightSolver, IterationEvent, MergeOutcome, Orientation,
};
pub use config::{ClarkeWrightConfig, CostUpdate};
pub use savings::{Saving, SavingsList};
