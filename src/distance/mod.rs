//! Distance matrices.
//!
//! Provides a dense distance matrix indexed by node id (0 = depot).

mod matrix;

pub use matrix::DistanceMatrix;
