//! Savings list for the Clarke-Wright heuristic.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::DEPOT;

/// The distance saved by serving `source` and `target` on one trip instead
/// of two separate depot round trips:
///
/// ```text
/// s(i, j) = d(i, 0) + d(j, 0) - d(i, j)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Saving {
    /// Lower customer id of the pair.
    pub source: usize,
    /// Higher customer id of the pair.
    pub target: usize,
    /// Saving value.
    pub value: f64,
}

impl Saving {
    /// Priority order of the savings list: descending value, ties broken by
    /// ascending source then ascending target.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then(self.source.cmp(&other.source))
            .then(self.target.cmp(&other.target))
    }
}

/// All customer pairs with their saving, in processing order.
///
/// # Examples
///
/// ```
/// use u_savings::distance::DistanceMatrix;
/// use u_savings::constructive::SavingsList;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0)]);
/// let savings = SavingsList::compute(&dm);
/// assert_eq!(savings.len(), 3);
/// assert_eq!((savings[0].source, savings[0].target), (1, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SavingsList {
    savings: Vec<Saving>,
}

impl SavingsList {
    /// Computes the saving of every unordered customer pair and sorts them
    /// into processing order.
    pub fn compute(distances: &DistanceMatrix) -> Self {
        let n = distances.size();
        let num_customers = n.saturating_sub(1);
        let mut savings = Vec::with_capacity(num_customers * num_customers.saturating_sub(1) / 2);
        for i in 1..n {
            for j in (i + 1)..n {
                let value = distances.get(i, DEPOT) + distances.get(j, DEPOT) - distances.get(i, j);
                savings.push(Saving {
                    source: i,
                    target: j,
                    value,
                });
            }
        }
        savings.sort_by(Saving::priority_cmp);
        Self { savings }
    }

    /// Drops every saving whose value is not strictly above `threshold`,
    /// preserving the order of the rest.
    pub fn retain_above(&mut self, threshold: f64) {
        self.savings.retain(|s| s.value > threshold);
    }

    /// Number of savings.
    pub fn len(&self) -> usize {
        self.savings.len()
    }

    /// Returns `true` if there are no savings.
    pub fn is_empty(&self) -> bool {
        self.savings.is_empty()
    }

    /// Iterates savings in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, Saving> {
        self.savings.iter()
    }

    /// Returns the savings in processing order.
    pub fn as_slice(&self) -> &[Saving] {
        &self.savings
    }
}

impl std::ops::Index<usize> for SavingsList {
    type Output = Saving;

    fn index(&self, index: usize) -> &Saving {
        &self.savings[index]
    }
}

impl IntoIterator for SavingsList {
    type Item = Saving;
    type IntoIter = std::vec::IntoIter<Saving>;

    fn into_iter(self) -> Self::IntoIter {
        self.savings.into_iter()
    }
}

impl<'a> IntoIterator for &'a SavingsList {
    type Item = &'a Saving;
    type IntoIter = std::slice::Iter<'a, Saving>;

    fn into_iter(self) -> Self::IntoIter {
        self.savings.iter()
    }
}
