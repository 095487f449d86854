//! # u-savings
//!
//! Capacitated vehicle routing with the Clarke-Wright savings heuristic:
//! route and solution primitives plus the savings construction that drives
//! them.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (DemandTable, Route, Solution)
//! - [`distance`] — Distance matrix
//! - [`evaluation`] — Route cost/load evaluation and feasibility checking
//! - [`constructive`] — Savings list and the Clarke-Wright solver
//! - [`error`] — Crate error type

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;

pub use error::{Error, Result};
