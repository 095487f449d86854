//! Route type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{check_index, Error, Result};

/// An ordered sequence of node ids driven by a single vehicle.
///
/// Routes built by the savings heuristic are round trips: they begin and end
/// with [`DEPOT`](super::DEPOT), with customers in between. The sequence
/// itself does not enforce that shape; positional operations work on the raw
/// sequence and clients keep the depot bracketing.
///
/// `load` and `cost` are bookkeeping fields assigned by the owner of the
/// route (usually the solver). They are not derived from the sequence.
///
/// # Examples
///
/// ```
/// use u_savings::models::{Route, DEPOT};
///
/// let mut route = Route::round_trip(3, 10.0);
/// assert_eq!(route.nodes(), &[DEPOT, 3, DEPOT]);
/// route.insert(5, 2).unwrap();
/// assert_eq!(route.nodes(), &[0, 3, 5, 0]);
/// assert!(route.is_first_customer(3));
/// assert!(route.is_last_customer(5));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    nodes: Vec<usize>,
    load: f64,
    cost: f64,
}

impl Route {
    /// Creates an empty route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a route over the given node sequence with zero load and cost.
    pub fn from_nodes(nodes: Vec<usize>) -> Self {
        Self {
            nodes,
            load: 0.0,
            cost: 0.0,
        }
    }

    /// Creates the singleton round trip `depot -> customer -> depot`.
    pub fn round_trip(customer: usize, load: f64) -> Self {
        Self {
            nodes: vec![super::DEPOT, customer, super::DEPOT],
            load,
            cost: 0.0,
        }
    }

    /// Number of nodes in the sequence, depot occurrences included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns `true` if `id` occurs anywhere in the sequence.
    pub fn contains(&self, id: usize) -> bool {
        self.nodes.contains(&id)
    }

    /// Position of the first occurrence of `id`.
    pub fn position_of(&self, id: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }

    /// Node at position `i`.
    pub fn get(&self, i: usize) -> Result<usize> {
        self.nodes
            .get(i)
            .copied()
            .ok_or(Error::Index {
                index: i,
                len: self.nodes.len(),
            })
    }

    /// Appends a node to the end of the sequence.
    pub fn push(&mut self, id: usize) {
        self.nodes.push(id);
    }

    /// Inserts `id` at position `i`, shifting later nodes right.
    ///
    /// `i == len()` appends.
    pub fn insert(&mut self, id: usize, i: usize) -> Result<()> {
        check_index(i, self.nodes.len() + 1)?;
        self.nodes.insert(i, id);
        Ok(())
    }

    /// Removes the first occurrence of `id`. Returns whether it was found.
    pub fn remove_node(&mut self, id: usize) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.nodes.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the node at position `i`, shifting later nodes left.
    pub fn remove(&mut self, i: usize) -> Result<usize> {
        check_index(i, self.nodes.len())?;
        Ok(self.nodes.remove(i))
    }

    /// Swaps the nodes at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.nodes.len())?;
        check_index(j, self.nodes.len())?;
        self.nodes.swap(i, j);
        Ok(())
    }

    /// Moves the node at position `i` so that it ends up at position `j`.
    ///
    /// ```
    /// use u_savings::models::Route;
    ///
    /// let mut r = Route::from_nodes(vec![0, 1, 2, 3, 0]);
    /// r.relocate(1, 3).unwrap();
    /// assert_eq!(r.nodes(), &[0, 2, 3, 1, 0]);
    /// r.relocate(3, 1).unwrap();
    /// assert_eq!(r.nodes(), &[0, 1, 2, 3, 0]);
    /// ```
    pub fn relocate(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.nodes.len())?;
        check_index(j, self.nodes.len())?;
        let id = self.nodes.remove(i);
        self.nodes.insert(j, id);
        Ok(())
    }

    /// Reverses the sequence in place; head and tail swap roles.
    pub fn reverse(&mut self) {
        self.nodes.reverse();
    }

    /// Appends every node of `nodes`, in order.
    pub fn extend_from_slice(&mut self, nodes: &[usize]) {
        self.nodes.extend_from_slice(nodes);
    }

    /// Returns `true` if `id` is the customer right after the leading depot.
    pub fn is_first_customer(&self, id: usize) -> bool {
        self.nodes.len() >= 3 && self.nodes[1] == id
    }

    /// Returns `true` if `id` is the customer right before the trailing depot.
    pub fn is_last_customer(&self, id: usize) -> bool {
        self.nodes.len() >= 3 && self.nodes[self.nodes.len() - 2] == id
    }

    /// Returns `true` if the route starts and ends at `depot` and visits at
    /// least one other node.
    pub fn is_round_trip(&self, depot: usize) -> bool {
        self.nodes.len() >= 3
            && self.nodes.first() == Some(&depot)
            && self.nodes.last() == Some(&depot)
    }

    /// Interior nodes, i.e. everything except the first and last position.
    pub fn customers(&self) -> &[usize] {
        if self.nodes.len() < 2 {
            &[]
        } else {
            &self.nodes[1..self.nodes.len() - 1]
        }
    }

    /// Load carried on this route.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Sets the load.
    pub fn set_load(&mut self, load: f64) {
        self.load = load;
    }

    /// Travel cost of this route.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Sets the cost.
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl fmt::Display for Route {
    /// Debug rendering `cost|load|[n0 n1 ... nk]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|[", self.cost, self.load)?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, "]")
    }
}
