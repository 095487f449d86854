//! Per-node demand table.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Demand of every node, indexed by node id.
///
/// By convention `demand(0) == 0` (the depot). This is not validated here;
/// instance readers own that check.
///
/// # Examples
///
/// ```
/// use u_savings::models::DemandTable;
///
/// let mut demands = DemandTable::from_vec(vec![0.0, 18.0, 26.0]);
/// assert_eq!(demands.demand(2), 26.0);
///
/// demands.set(2, 11.0);
/// assert_eq!(demands.total(), 29.0);
/// assert!(demands.set_all(&[0.0, 1.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandTable {
    demands: Vec<f64>,
}

impl DemandTable {
    /// Creates a table of `size` nodes, all with zero demand.
    pub fn new(size: usize) -> Self {
        Self {
            demands: vec![0.0; size],
        }
    }

    /// Wraps an explicit demand vector.
    pub fn from_vec(demands: Vec<f64>) -> Self {
        Self { demands }
    }

    /// Number of nodes, depot included.
    pub fn len(&self) -> usize {
        self.demands.len()
    }

    /// Returns `true` if the table has no nodes.
    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    /// Demand of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn demand(&self, id: usize) -> f64 {
        self.demands[id]
    }

    /// Sets the demand of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn set(&mut self, id: usize, demand: f64) {
        self.demands[id] = demand;
    }

    /// Replaces every demand at once.
    ///
    /// Fails with [`Error::Shape`] and leaves the table untouched if the
    /// slice length differs from the table size.
    pub fn set_all(&mut self, demands: &[f64]) -> Result<()> {
        if demands.len() != self.demands.len() {
            return Err(Error::Shape(format!(
                "expected {} demands, got {}",
                self.demands.len(),
                demands.len()
            )));
        }
        self.demands.copy_from_slice(demands);
        Ok(())
    }

    /// Sum of all demands.
    pub fn total(&self) -> f64 {
        self.demands.iter().sum()
    }

    /// Returns the demands in node order.
    pub fn as_slice(&self) -> &[f64] {
        &self.demands
    }
}
