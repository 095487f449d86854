//! Solution and violation types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Route;
use crate::error::{check_index, Error, Result};

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// Route does not start and end at the depot.
    MissingDepot {
        /// Route index.
        route_index: usize,
    },
    /// Customer visited more than once across the solution.
    DuplicateCustomer {
        /// Customer ID.
        customer_id: usize,
    },
    /// Customer not visited by any route.
    UnservedCustomer {
        /// Customer ID.
        customer_id: usize,
    },
    /// Recorded route cost differs from the cost of its sequence.
    CostMismatch {
        /// Route index.
        route_index: usize,
        /// Cost stored on the route.
        recorded: f64,
        /// Cost recomputed from the distance matrix.
        actual: f64,
    },
    /// Recorded route load differs from the sum of its customers' demands.
    LoadMismatch {
        /// Route index.
        route_index: usize,
        /// Load stored on the route.
        recorded: f64,
        /// Load recomputed from the demand table.
        actual: f64,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// An ordered collection of routes.
///
/// Route indices are positions, not identities: removing a route shifts every
/// later index down by one. Node membership is answered by a linear scan over
/// the routes.
///
/// # Examples
///
/// ```
/// use u_savings::models::{Route, Solution};
///
/// let mut sol = Solution::new();
/// sol.add_route(Route::from_nodes(vec![0, 3, 4, 5, 0]));
/// sol.add_route(Route::from_nodes(vec![0, 2, 1, 0]));
/// assert_eq!(sol.route_index_of(1), Some(1));
///
/// sol.insert_node(6, 1, 1).unwrap();
/// assert_eq!(sol.route(1).unwrap().nodes(), &[0, 6, 2, 1, 0]);
///
/// let removed = sol.remove_route(0).unwrap();
/// assert_eq!(removed.nodes(), &[0, 3, 4, 5, 0]);
/// assert_eq!(sol.route_index_of(1), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the solution has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the route at index `r`.
    pub fn route(&self, r: usize) -> Result<&Route> {
        self.routes.get(r).ok_or(Error::Index {
            index: r,
            len: self.routes.len(),
        })
    }

    fn route_mut(&mut self, r: usize) -> Result<&mut Route> {
        let len = self.routes.len();
        self.routes.get_mut(r).ok_or(Error::Index { index: r, len })
    }

    /// Returns `true` if any route visits `id`.
    pub fn contains_node(&self, id: usize) -> bool {
        self.routes.iter().any(|r| r.contains(id))
    }

    /// Index of the first route visiting `id`.
    pub fn route_index_of(&self, id: usize) -> Option<usize> {
        self.routes.iter().position(|r| r.contains(id))
    }

    /// Appends a route.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Inserts a route at index `r`, shifting later routes. `r == num_routes()`
    /// appends.
    pub fn insert_route(&mut self, route: Route, r: usize) -> Result<()> {
        check_index(r, self.routes.len() + 1)?;
        self.routes.insert(r, route);
        Ok(())
    }

    /// Removes and returns the route at index `r`.
    pub fn remove_route(&mut self, r: usize) -> Result<Route> {
        check_index(r, self.routes.len())?;
        Ok(self.routes.remove(r))
    }

    /// Removes every route whose sequence has exactly `size` nodes.
    pub fn remove_routes_by_size(&mut self, size: usize) {
        self.routes.retain(|r| r.len() != size);
    }

    /// Node at position `i` of route `r`.
    pub fn node(&self, r: usize, i: usize) -> Result<usize> {
        self.route(r)?.get(i)
    }

    /// Removes the node at position `i` of route `r` and returns its id.
    ///
    /// No routing semantics are checked: removing a depot occurrence is
    /// allowed and leaves the route open.
    pub fn remove_node(&mut self, r: usize, i: usize) -> Result<usize> {
        self.route_mut(r)?.remove(i)
    }

    /// Inserts `id` at position `i` of route `r`. `i == route length` appends.
    pub fn insert_node(&mut self, id: usize, r: usize, i: usize) -> Result<()> {
        self.route_mut(r)?.insert(id, i)
    }

    /// Appends `nodes` to the end of route `r`.
    pub fn extend_route(&mut self, r: usize, nodes: &[usize]) -> Result<()> {
        self.route_mut(r)?.extend_from_slice(nodes);
        Ok(())
    }

    /// Reverses route `r` in place.
    pub fn reverse_route(&mut self, r: usize) -> Result<()> {
        self.route_mut(r)?.reverse();
        Ok(())
    }

    /// Load of route `r`.
    pub fn load(&self, r: usize) -> Result<f64> {
        Ok(self.route(r)?.load())
    }

    /// Sets the load of route `r`.
    pub fn set_load(&mut self, r: usize, load: f64) -> Result<()> {
        self.route_mut(r)?.set_load(load);
        Ok(())
    }

    /// Cost of route `r`.
    pub fn cost(&self, r: usize) -> Result<f64> {
        Ok(self.route(r)?.cost())
    }

    /// Sets the cost of route `r`.
    pub fn set_cost(&mut self, r: usize, cost: f64) -> Result<()> {
        self.route_mut(r)?.set_cost(cost);
        Ok(())
    }

    /// Sum of the route costs.
    pub fn total_objective(&self) -> f64 {
        self.routes.iter().map(|r| r.cost()).sum()
    }

    /// Sum of the route loads.
    pub fn total_load(&self) -> f64 {
        self.routes.iter().map(|r| r.load()).sum()
    }

    /// Total number of customers served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.customers().len()).sum()
    }
}

impl fmt::Display for Solution {
    /// Objective on the first line, then one route per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.total_objective())?;
        for route in &self.routes {
            writeln!(f, "{route}")?;
        }
        Ok(())
    }
}
