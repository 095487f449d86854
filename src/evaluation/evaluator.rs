//! Route evaluator that recomputes cost and load and checks feasibility.

use crate::distance::DistanceMatrix;
use crate::models::{DemandTable, Route, Solution, Violation, ViolationType, DEPOT};

/// Recomputed values are compared against the recorded ones with this
/// absolute tolerance.
const TOLERANCE: f64 = 1e-9;

/// Evaluates routes against the instance data: recomputes cost and load from
/// the node sequence and checks the invariants of a finished construction
/// (depot bracketing, capacity, each customer served exactly once, recorded
/// cost/load consistent with the sequence).
///
/// # Examples
///
/// ```
/// use u_savings::distance::DistanceMatrix;
/// use u_savings::evaluation::RouteEvaluator;
/// use u_savings::models::{DemandTable, Route, Solution};
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// let demands = DemandTable::from_vec(vec![0.0, 10.0, 20.0]);
/// let evaluator = RouteEvaluator::new(&dm, &demands, 100.0);
///
/// let mut route = Route::from_nodes(vec![0, 1, 2, 0]);
/// route.set_cost(evaluator.route_cost(route.nodes()));
/// route.set_load(evaluator.route_load(route.nodes()));
///
/// let mut sol = Solution::new();
/// sol.add_route(route);
/// assert!(evaluator.evaluate_solution(&sol).is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    distances: &'a DistanceMatrix,
    demands: &'a DemandTable,
    capacity: f64,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given problem data.
    pub fn new(distances: &'a DistanceMatrix, demands: &'a DemandTable, capacity: f64) -> Self {
        Self {
            distances,
            demands,
            capacity,
        }
    }

    /// Sum of consecutive-pair distances along `nodes`.
    pub fn route_cost(&self, nodes: &[usize]) -> f64 {
        self.distances.path_cost(nodes)
    }

    /// Sum of the demands of every non-depot node in `nodes`.
    pub fn route_load(&self, nodes: &[usize]) -> f64 {
        nodes
            .iter()
            .filter(|&&id| id != DEPOT)
            .map(|&id| self.demands.demand(id))
            .sum()
    }

    /// Checks a single route, tagging violations with `route_index`.
    pub fn evaluate_route(&self, route_index: usize, route: &Route) -> Vec<Violation> {
        let mut violations = Vec::new();

        if !route.is_round_trip(DEPOT) {
            violations.push(Violation::new(ViolationType::MissingDepot { route_index }));
        }

        if route.load() > self.capacity {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index,
                load: route.load(),
                capacity: self.capacity,
            }));
        }

        let actual = self.route_cost(route.nodes());
        if (actual - route.cost()).abs() > TOLERANCE {
            violations.push(Violation::new(ViolationType::CostMismatch {
                route_index,
                recorded: route.cost(),
                actual,
            }));
        }

        let actual = self.route_load(route.nodes());
        if (actual - route.load()).abs() > TOLERANCE {
            violations.push(Violation::new(ViolationType::LoadMismatch {
                route_index,
                recorded: route.load(),
                actual,
            }));
        }

        violations
    }

    /// Checks every route and customer coverage of a whole solution.
    pub fn evaluate_solution(&self, solution: &Solution) -> Vec<Violation> {
        let n = self.distances.size();
        let mut visits = vec![0usize; n];
        let mut all_violations = Vec::new();

        for (idx, route) in solution.routes().iter().enumerate() {
            all_violations.extend(self.evaluate_route(idx, route));
            for &id in route.nodes() {
                if id != DEPOT && id < n {
                    visits[id] += 1;
                }
            }
        }

        for (customer_id, &count) in visits.iter().enumerate().skip(1) {
            match count {
                1 => {}
                0 => all_violations.push(Violation::new(ViolationType::UnservedCustomer {
                    customer_id,
                })),
                _ => all_violations.push(Violation::new(ViolationType::DuplicateCustomer {
                    customer_id,
                })),
            }
        }

        all_violations
    }

    /// Returns `true` if the solution has no violations.
    pub fn is_feasible(&self, solution: &Solution) -> bool {
        self.evaluate_solution(solution).is_empty()
    }
}
