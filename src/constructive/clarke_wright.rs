//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) serves every customer with
//! its own round trip (depot → customer → depot) and then merges routes in
//! decreasing order of the "saving" of linking two customers directly:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Round trips are created lazily, the first time a customer appears in the
//! savings list. For each saving `(i, j)`:
//!
//! - neither customer is routed: both singletons are created and joined;
//! - one customer is routed: a singleton is created for the other and joined
//!   to the routed one's route if that customer touches the depot;
//! - both are routed on different routes: the routes are joined if both
//!   customers touch the depot;
//! - both are on the same route: nothing happens.
//!
//! A join is only committed if the combined load fits the vehicle capacity.
//! The savings list is walked exactly once.
//!
//! # Complexity
//!
//! O(n² log n) to build the savings list, then O(n²) iterations each doing a
//! linear scan over the routes, O(n³) overall with [`CostUpdate::Full`].
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::config::{ClarkeWrightConfig, CostUpdate};
use super::savings::{Saving, SavingsList};
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};
use crate::evaluation::RouteEvaluator;
use crate::models::{DemandTable, Route, Solution};

/// Which ends of the two routes are spliced together.
///
/// The first word names the end of the route holding the saving's source,
/// the second the end of the route holding its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Source head meets target head: source route is reversed, target appended.
    HeadHead,
    /// Source head meets target tail: source appended to target.
    HeadTail,
    /// Source tail meets target head: target appended to source.
    TailHead,
    /// Source tail meets target tail: target reversed, then appended to source.
    TailTail,
}

/// What processing one saving did to the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Two routes were joined.
    Merged(Orientation),
    /// The join would exceed capacity; routes left unchanged.
    CapacityExceeded,
    /// A routed customer is not adjacent to the depot; no join attempted.
    InteriorNode,
    /// Both customers already share a route; no-op.
    SameRoute,
}

/// Snapshot handed to an observer after each processed saving.
#[derive(Debug)]
pub struct IterationEvent<'a> {
    /// Zero-based position of the saving in the list.
    pub iteration: usize,
    /// The saving just processed.
    pub saving: &'a Saving,
    /// Its effect.
    pub outcome: MergeOutcome,
    /// Solution after the iteration, costs refreshed.
    pub solution: &'a Solution,
}

/// Where a customer sits in its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Head,
    Tail,
    Interior,
}

fn endpoint(route: &Route, id: usize) -> Endpoint {
    if route.is_first_customer(id) {
        Endpoint::Head
    } else if route.is_last_customer(id) {
        Endpoint::Tail
    } else {
        Endpoint::Interior
    }
}

fn last_position(route: &Route) -> Result<usize> {
    route
        .len()
        .checked_sub(1)
        .ok_or(Error::Index { index: 0, len: 0 })
}

/// Clarke-Wright savings construction for the capacitated VRP.
///
/// # Examples
///
/// ```
/// use u_savings::constructive::ClarkeWrightSolver;
/// use u_savings::distance::DistanceMatrix;
/// use u_savings::models::DemandTable;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0)]);
/// let demands = DemandTable::from_vec(vec![0.0, 1.0, 1.0, 1.0]);
///
/// let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).unwrap();
/// let solution = solver.run().unwrap();
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.route(0).unwrap().nodes(), &[0, 3, 2, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct ClarkeWrightSolver<'a> {
    distances: &'a DistanceMatrix,
    demands: &'a DemandTable,
    capacity: f64,
    config: ClarkeWrightConfig,
}

impl<'a> ClarkeWrightSolver<'a> {
    /// Creates a solver over the given instance.
    ///
    /// Fails with [`Error::Shape`] if the demand table and distance matrix
    /// disagree on the number of nodes, or if `capacity` is not a positive
    /// finite number.
    pub fn new(distances: &'a DistanceMatrix, demands: &'a DemandTable, capacity: f64) -> Result<Self> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(Error::Shape(format!(
                "capacity must be positive and finite, got {capacity}"
            )));
        }
        if demands.len() != distances.size() {
            return Err(Error::Shape(format!(
                "{} demands for a {}-node distance matrix",
                demands.len(),
                distances.size()
            )));
        }
        Ok(Self {
            distances,
            demands,
            capacity,
            config: ClarkeWrightConfig::default(),
        })
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ClarkeWrightConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        self.config = config;
        Ok(self)
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Active configuration.
    pub fn config(&self) -> &ClarkeWrightConfig {
        &self.config
    }

    /// Savings list this solver processes, in order.
    pub fn savings(&self) -> SavingsList {
        let mut savings = SavingsList::compute(self.distances);
        if let Some(threshold) = self.config.min_saving {
            savings.retain_above(threshold);
        }
        savings
    }

    /// Runs the construction to completion.
    pub fn run(&self) -> Result<Solution> {
        self.run_with_observer(|_| {})
    }

    /// Runs the construction, calling `observer` after every saving.
    pub fn run_with_observer<F>(&self, mut observer: F) -> Result<Solution>
    where
        F: FnMut(&IterationEvent<'_>),
    {
        let savings = self.savings();
        debug!(
            customers = self.distances.size().saturating_sub(1),
            savings = savings.len(),
            capacity = self.capacity,
            "starting savings construction"
        );

        let mut solution = Solution::new();
        for (iteration, saving) in savings.iter().enumerate() {
            let outcome = self.apply(&mut solution, saving)?;
            trace!(
                iteration,
                source = saving.source,
                target = saving.target,
                value = saving.value,
                ?outcome,
                "saving processed"
            );
            self.update_costs(&mut solution, saving)?;
            observer(&IterationEvent {
                iteration,
                saving,
                outcome,
                solution: &solution,
            });
        }

        self.serve_unrouted(&mut solution)?;
        self.report(&solution);
        Ok(solution)
    }

    fn singleton(&self, customer: usize) -> Route {
        let mut route = Route::round_trip(customer, self.demands.demand(customer));
        route.set_cost(self.distances.path_cost(route.nodes()));
        route
    }

    fn apply(&self, solution: &mut Solution, saving: &Saving) -> Result<MergeOutcome> {
        let (s, t) = (saving.source, saving.target);
        match (solution.route_index_of(s), solution.route_index_of(t)) {
            (None, None) => {
                solution.add_route(self.singleton(s));
                solution.add_route(self.singleton(t));
                let rt = solution.num_routes() - 1;
                self.join(solution, rt - 1, rt, Orientation::HeadTail)
            }
            (Some(rs), None) => {
                solution.add_route(self.singleton(t));
                let rt = solution.num_routes() - 1;
                match endpoint(solution.route(rs)?, s) {
                    Endpoint::Head => self.join(solution, rs, rt, Orientation::HeadTail),
                    Endpoint::Tail => self.join(solution, rs, rt, Orientation::TailTail),
                    Endpoint::Interior => Ok(MergeOutcome::InteriorNode),
                }
            }
            (None, Some(rt)) => {
                solution.add_route(self.singleton(s));
                let rs = solution.num_routes() - 1;
                match endpoint(solution.route(rt)?, t) {
                    Endpoint::Head => self.join(solution, rs, rt, Orientation::TailHead),
                    Endpoint::Tail => self.join(solution, rs, rt, Orientation::HeadTail),
                    Endpoint::Interior => Ok(MergeOutcome::InteriorNode),
                }
            }
            (Some(rs), Some(rt)) if rs == rt => Ok(MergeOutcome::SameRoute),
            (Some(rs), Some(rt)) => {
                let orientation = match (
                    endpoint(solution.route(rs)?, s),
                    endpoint(solution.route(rt)?, t),
                ) {
                    (Endpoint::Head, Endpoint::Head) => Orientation::HeadHead,
                    (Endpoint::Head, Endpoint::Tail) => Orientation::HeadTail,
                    (Endpoint::Tail, Endpoint::Head) => Orientation::TailHead,
                    (Endpoint::Tail, Endpoint::Tail) => Orientation::TailTail,
                    _ => return Ok(MergeOutcome::InteriorNode),
                };
                self.join(solution, rs, rt, orientation)
            }
        }
    }

    /// Splices route `rs` (holding the source) and route `rt` (holding the
    /// target) if their combined load fits. The absorbed route is removed
    /// from the solution.
    fn join(
        &self,
        solution: &mut Solution,
        rs: usize,
        rt: usize,
        orientation: Orientation,
    ) -> Result<MergeOutcome> {
        let load = solution.load(rs)? + solution.load(rt)?;
        if load > self.capacity {
            return Ok(MergeOutcome::CapacityExceeded);
        }

        // Head-tail keeps the target route and absorbs the source route.
        let (keep, absorb) = match orientation {
            Orientation::HeadTail => (rt, rs),
            _ => (rs, rt),
        };
        let mut absorbed = solution.remove_route(absorb)?;
        let keep = if absorb < keep { keep - 1 } else { keep };

        if orientation == Orientation::HeadHead {
            solution.remove_node(keep, 0)?;
            solution.reverse_route(keep)?;
        } else {
            let tail = last_position(solution.route(keep)?)?;
            solution.remove_node(keep, tail)?;
        }

        if orientation == Orientation::TailTail {
            absorbed.remove(last_position(&absorbed)?)?;
            absorbed.reverse();
        } else {
            absorbed.remove(0)?;
        }

        solution.extend_route(keep, absorbed.nodes())?;
        solution.set_load(keep, load)?;
        Ok(MergeOutcome::Merged(orientation))
    }

    fn price_route(&self, solution: &mut Solution, r: usize) -> Result<()> {
        let cost = self.distances.path_cost(solution.route(r)?.nodes());
        solution.set_cost(r, cost)
    }

    fn update_costs(&self, solution: &mut Solution, saving: &Saving) -> Result<()> {
        match self.config.cost_update {
            CostUpdate::Full => {
                for r in 0..solution.num_routes() {
                    self.price_route(solution, r)?;
                }
            }
            CostUpdate::Incremental => {
                for id in [saving.source, saving.target] {
                    if let Some(r) = solution.route_index_of(id) {
                        self.price_route(solution, r)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Gives a round trip to every customer no processed saving referenced.
    fn serve_unrouted(&self, solution: &mut Solution) -> Result<()> {
        for id in 1..self.distances.size() {
            if !solution.contains_node(id) {
                trace!(customer = id, "customer never referenced, adding round trip");
                solution.add_route(self.singleton(id));
                let r = solution.num_routes() - 1;
                self.price_route(solution, r)?;
            }
        }
        Ok(())
    }

    fn report(&self, solution: &Solution) {
        let evaluator = RouteEvaluator::new(self.distances, self.demands, self.capacity);
        for violation in evaluator.evaluate_solution(solution) {
            warn!(kind = ?violation.kind, "constructed solution violates a constraint");
        }
        debug!(
            routes = solution.num_routes(),
            objective = solution.total_objective(),
            "savings construction finished"
        );
    }
}

/// Constructs a CVRP solution with the Clarke-Wright savings algorithm and
/// the default configuration.
///
/// # Arguments
///
/// * `distances` — Distance matrix (node 0 = depot)
/// * `demands` — Demand per node
/// * `capacity` — Vehicle capacity (homogeneous fleet, unlimited count)
///
/// # Examples
///
/// ```
/// use u_savings::constructive::clarke_wright_savings;
/// use u_savings::distance::DistanceMatrix;
/// use u_savings::models::DemandTable;
///
/// let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
/// let demands = DemandTable::from_vec(vec![0.0, 10.0, 10.0, 10.0]);
///
/// let solution = clarke_wright_savings(&dm, &demands, 30.0).unwrap();
/// assert_eq!(solution.num_served(), 3);
/// ```
pub fn clarke_wright_savings(
    distances: &DistanceMatrix,
    demands: &DemandTable,
    capacity: f64,
) -> Result<Solution> {
    ClarkeWrightSolver::new(distances, demands, capacity)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViolationType;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Depot (0,0), A=1 (1,0), B=2 (2,0), C=3 (0,1), unit demands.
    fn abc_instance() -> (DistanceMatrix, DemandTable) {
        let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 1.0)]);
        let demands = DemandTable::from_vec(vec![0.0, 1.0, 1.0, 1.0]);
        (dm, demands)
    }

    fn line_instance(demand: f64) -> (DistanceMatrix, DemandTable) {
        let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let demands = DemandTable::from_vec(vec![0.0, demand, demand, demand]);
        (dm, demands)
    }

    fn random_instance(seed: u64, n: usize) -> (DistanceMatrix, DemandTable) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let demands: Vec<f64> = (0..n)
            .map(|i| if i == 0 { 0.0 } else { f64::from(rng.random_range(1u32..=20)) })
            .collect();
        (
            DistanceMatrix::from_coordinates(&points),
            DemandTable::from_vec(demands),
        )
    }

    fn outcomes(solver: &ClarkeWrightSolver<'_>) -> (Solution, Vec<MergeOutcome>) {
        let mut seen = Vec::new();
        let solution = solver
            .run_with_observer(|event| seen.push(event.outcome))
            .expect("run");
        (solution, seen)
    }

    fn priced(dm: &DistanceMatrix, nodes: Vec<usize>, load: f64) -> Route {
        let mut route = Route::from_nodes(nodes);
        route.set_load(load);
        route.set_cost(dm.path_cost(route.nodes()));
        route
    }

    #[test]
    fn test_cw_hub_scenario() {
        let (dm, demands) = abc_instance();
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");
        let (sol, seen) = outcomes(&solver);

        assert_eq!(
            seen,
            vec![
                MergeOutcome::Merged(Orientation::HeadTail),
                MergeOutcome::Merged(Orientation::HeadTail),
                MergeOutcome::SameRoute,
            ]
        );
        assert_eq!(sol.num_routes(), 1);
        let route = sol.route(0).expect("route");
        // B (2) links A (1) and C (3).
        assert_eq!(route.nodes(), &[0, 3, 2, 1, 0]);
        assert_eq!(route.load(), 3.0);
        let expected = 3.0 + 5f64.sqrt();
        assert!((route.cost() - expected).abs() < 1e-10);
        assert!((sol.total_objective() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_cw_infeasible_merges() {
        let (dm, demands) = abc_instance();
        let solver = ClarkeWrightSolver::new(&dm, &demands, 1.0).expect("valid");
        let (sol, seen) = outcomes(&solver);

        assert!(seen.iter().all(|&o| o == MergeOutcome::CapacityExceeded));
        assert_eq!(sol.num_routes(), 3);
        for route in sol.routes() {
            assert_eq!(route.len(), 3);
            assert_eq!(route.load(), 1.0);
            let customer = route.nodes()[1];
            assert!((route.cost() - 2.0 * dm.get(0, customer)).abs() < 1e-10);
        }
        assert!((sol.total_objective() - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_cw_line() {
        let (dm, demands) = line_instance(10.0);
        let sol = clarke_wright_savings(&dm, &demands, 30.0).expect("valid");
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.num_routes(), 1);
        // 0→3→2→1→0 = 6.0
        assert!((sol.total_objective() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_cw_capacity_split() {
        let (dm, demands) = line_instance(15.0);
        let sol = clarke_wright_savings(&dm, &demands, 25.0).expect("valid");
        assert_eq!(sol.num_served(), 3);
        assert!(sol.num_routes() >= 2);
        assert!(sol.routes().iter().all(|r| r.load() <= 25.0));
    }

    #[test]
    fn test_cw_empty() {
        let dm = DistanceMatrix::new(1);
        let demands = DemandTable::new(1);
        let sol = clarke_wright_savings(&dm, &demands, 100.0).expect("valid");
        assert_eq!(sol.num_routes(), 0);
    }

    #[test]
    fn test_cw_single_customer() {
        let dm = DistanceMatrix::from_coordinates(&[(0.0, 0.0), (5.0, 0.0)]);
        let demands = DemandTable::from_vec(vec![0.0, 10.0]);
        let sol = clarke_wright_savings(&dm, &demands, 100.0).expect("valid");
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 1, 0]);
        assert!((sol.total_objective() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_rejects_bad_capacity() {
        let (dm, demands) = abc_instance();
        for capacity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ClarkeWrightSolver::new(&dm, &demands, capacity),
                Err(Error::Shape(_))
            ));
        }
    }

    #[test]
    fn test_rejects_demand_length_mismatch() {
        let (dm, _) = abc_instance();
        let demands = DemandTable::from_vec(vec![0.0, 1.0]);
        assert!(matches!(
            ClarkeWrightSolver::new(&dm, &demands, 10.0),
            Err(Error::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let (dm, demands) = abc_instance();
        let solver = ClarkeWrightSolver::new(&dm, &demands, 10.0).expect("valid");
        let config = ClarkeWrightConfig::default().with_min_saving(f64::NAN);
        assert!(matches!(solver.with_config(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_min_saving_still_serves_everyone() {
        let (dm, demands) = abc_instance();
        let config = ClarkeWrightConfig::default().with_min_saving(1.0);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0)
            .expect("valid")
            .with_config(config)
            .expect("valid config");
        assert_eq!(solver.savings().len(), 1);

        let sol = solver.run().expect("run");
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 2, 1, 0]);
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 3, 0]);
        assert!((sol.cost(1).expect("cost") - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_same_route_is_noop() {
        let (dm, demands) = abc_instance();
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 1, 3, 0], 2.0));
        sol.add_route(priced(&dm, vec![0, 2, 0], 1.0));
        let before = sol.clone();

        let saving = Saving {
            source: 1,
            target: 3,
            value: 0.5,
        };
        let outcome = solver.apply(&mut sol, &saving).expect("apply");
        assert_eq!(outcome, MergeOutcome::SameRoute);
        assert_eq!(sol, before);
    }

    #[test]
    fn test_interior_node_leaves_new_singleton() {
        let dm = DistanceMatrix::from_coordinates(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (2.0, 1.0),
        ]);
        let demands = DemandTable::from_vec(vec![0.0, 1.0, 1.0, 1.0, 1.0]);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 1, 2, 3, 0], 3.0));

        let saving = Saving {
            source: 2,
            target: 4,
            value: 1.0,
        };
        let outcome = solver.apply(&mut sol, &saving).expect("apply");
        assert_eq!(outcome, MergeOutcome::InteriorNode);
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 1, 2, 3, 0]);
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 4, 0]);
        assert_eq!(sol.load(1), Ok(1.0));

        // Both routed, one interior: nothing changes.
        let before = sol.clone();
        let saving = Saving {
            source: 2,
            target: 4,
            value: 1.0,
        };
        assert_eq!(
            solver.apply(&mut sol, &saving).expect("apply"),
            MergeOutcome::InteriorNode
        );
        assert_eq!(sol, before);
    }

    fn join_case(
        s_route: Vec<usize>,
        t_route: Vec<usize>,
        source: usize,
        target: usize,
    ) -> (Solution, MergeOutcome) {
        let dm = DistanceMatrix::new(7);
        let demands = DemandTable::from_vec(vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");
        let s_load = (s_route.len() - 2) as f64;
        let t_load = (t_route.len() - 2) as f64;
        let mut sol = Solution::new();
        sol.add_route(Route::round_trip(6, 1.0));
        sol.add_route(priced(&dm, s_route, s_load));
        sol.add_route(priced(&dm, t_route, t_load));
        let saving = Saving {
            source,
            target,
            value: 1.0,
        };
        let outcome = solver.apply(&mut sol, &saving).expect("apply");
        (sol, outcome)
    }

    #[test]
    fn test_join_head_head() {
        let (sol, outcome) = join_case(vec![0, 1, 2, 0], vec![0, 3, 4, 5, 0], 1, 3);
        assert_eq!(outcome, MergeOutcome::Merged(Orientation::HeadHead));
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 2, 1, 3, 4, 5, 0]);
        assert_eq!(sol.load(1), Ok(5.0));
    }

    #[test]
    fn test_join_head_tail() {
        let (sol, outcome) = join_case(vec![0, 1, 2, 0], vec![0, 3, 4, 5, 0], 1, 5);
        assert_eq!(outcome, MergeOutcome::Merged(Orientation::HeadTail));
        assert_eq!(sol.num_routes(), 2);
        // The target route is kept; it shifted down when the source was removed.
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 3, 4, 5, 1, 2, 0]);
        assert_eq!(sol.load(1), Ok(5.0));
    }

    #[test]
    fn test_join_tail_head() {
        let (sol, outcome) = join_case(vec![0, 1, 2, 0], vec![0, 3, 4, 5, 0], 2, 3);
        assert_eq!(outcome, MergeOutcome::Merged(Orientation::TailHead));
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 1, 2, 3, 4, 5, 0]);
    }

    #[test]
    fn test_join_tail_tail() {
        let (sol, outcome) = join_case(vec![0, 1, 2, 0], vec![0, 3, 4, 5, 0], 2, 5);
        assert_eq!(outcome, MergeOutcome::Merged(Orientation::TailTail));
        assert_eq!(sol.route(1).expect("route").nodes(), &[0, 1, 2, 5, 4, 3, 0]);
    }

    #[test]
    fn test_join_absorbed_route_precedes_kept_route() {
        let dm = DistanceMatrix::new(5);
        let demands = DemandTable::from_vec(vec![0.0, 1.0, 1.0, 1.0, 1.0]);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 1, 2, 0], 2.0));
        sol.add_route(priced(&dm, vec![0, 3, 4, 0], 2.0));
        let saving = Saving {
            source: 4,
            target: 1,
            value: 1.0,
        };
        let outcome = solver.apply(&mut sol, &saving).expect("apply");
        assert_eq!(outcome, MergeOutcome::Merged(Orientation::TailHead));
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 3, 4, 1, 2, 0]);
        assert_eq!(sol.load(0), Ok(4.0));
    }

    #[test]
    fn test_join_interior_pair() {
        let (sol, outcome) = join_case(vec![0, 1, 2, 3, 0], vec![0, 4, 5, 0], 2, 4);
        assert_eq!(outcome, MergeOutcome::InteriorNode);
        assert_eq!(sol.num_routes(), 3);
    }

    #[test]
    fn test_one_routed_orientations() {
        let (dm, demands) = line_instance(1.0);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 100.0).expect("valid");

        // Source routed at the tail: new customer appended after it.
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 2, 1, 0], 2.0));
        let saving = Saving {
            source: 1,
            target: 3,
            value: 1.0,
        };
        assert_eq!(
            solver.apply(&mut sol, &saving).expect("apply"),
            MergeOutcome::Merged(Orientation::TailTail)
        );
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 2, 1, 3, 0]);

        // Target routed at the head: new customer placed before it.
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 2, 3, 0], 2.0));
        let saving = Saving {
            source: 1,
            target: 2,
            value: 1.0,
        };
        assert_eq!(
            solver.apply(&mut sol, &saving).expect("apply"),
            MergeOutcome::Merged(Orientation::TailHead)
        );
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 1, 2, 3, 0]);

        // Target routed at the tail: new customer appended after it.
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 3, 2, 0], 2.0));
        assert_eq!(
            solver.apply(&mut sol, &saving).expect("apply"),
            MergeOutcome::Merged(Orientation::HeadTail)
        );
        assert_eq!(sol.route(0).expect("route").nodes(), &[0, 3, 2, 1, 0]);
        assert_eq!(sol.load(0), Ok(3.0));
    }

    #[test]
    fn test_capacity_rejection_leaves_routes_intact() {
        let (dm, demands) = line_instance(1.0);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 2.0).expect("valid");
        let mut sol = Solution::new();
        sol.add_route(priced(&dm, vec![0, 1, 2, 0], 2.0));
        sol.add_route(priced(&dm, vec![0, 3, 0], 1.0));
        let before = sol.clone();
        let saving = Saving {
            source: 2,
            target: 3,
            value: 1.0,
        };
        assert_eq!(
            solver.apply(&mut sol, &saving).expect("apply"),
            MergeOutcome::CapacityExceeded
        );
        assert_eq!(sol, before);
    }

    #[test]
    fn test_observer_sees_refreshed_costs() {
        let (dm, demands) = random_instance(7, 12);
        let solver = ClarkeWrightSolver::new(&dm, &demands, 40.0).expect("valid");
        let mut calls = 0;
        solver
            .run_with_observer(|event| {
                assert_eq!(event.iteration, calls);
                calls += 1;
                for route in event.solution.routes() {
                    assert!((route.cost() - dm.path_cost(route.nodes())).abs() < 1e-9);
                }
            })
            .expect("run");
        assert_eq!(calls, 11 * 10 / 2);
    }

    #[test]
    fn test_random_instances_are_feasible() {
        for seed in 0..20 {
            let (dm, demands) = random_instance(seed, 25);
            let sol = clarke_wright_savings(&dm, &demands, 60.0).expect("valid");
            let evaluator = RouteEvaluator::new(&dm, &demands, 60.0);
            let violations = evaluator.evaluate_solution(&sol);
            assert!(violations.is_empty(), "seed {seed}: {violations:?}");
            assert_eq!(sol.num_served(), 24);
        }
    }

    #[test]
    fn test_incremental_matches_full() {
        for seed in 0..10 {
            let (dm, demands) = random_instance(seed, 20);
            let full = clarke_wright_savings(&dm, &demands, 50.0).expect("valid");
            let incremental = ClarkeWrightSolver::new(&dm, &demands, 50.0)
                .expect("valid")
                .with_config(ClarkeWrightConfig::default().with_cost_update(CostUpdate::Incremental))
                .expect("valid config")
                .run()
                .expect("run");
            assert_eq!(full, incremental);
        }
    }

    #[test]
    fn test_oversized_demand_is_reported_not_fatal() {
        let (dm, _) = abc_instance();
        let demands = DemandTable::from_vec(vec![0.0, 1.0, 50.0, 1.0]);
        let sol = clarke_wright_savings(&dm, &demands, 10.0).expect("valid");
        let evaluator = RouteEvaluator::new(&dm, &demands, 10.0);
        let kinds: Vec<_> = evaluator
            .evaluate_solution(&sol)
            .into_iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(kinds.len(), 1);
        assert!(matches!(kinds[0], ViolationType::CapacityExceeded { load, .. } if load == 50.0));
        assert_eq!(sol.num_served(), 3);
    }

    mod invariants {
        use crate::constructive::clarke_wright_savings;
        use crate::distance::DistanceMatrix;
        use crate::evaluation::RouteEvaluator;
        use crate::models::DemandTable;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]
            #[test]
            fn terminal_solution_satisfies_invariants(
                points in prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 1..20),
                raw_demands in prop::collection::vec(1u32..10, 20),
                capacity in 10.0f64..60.0,
            ) {
                let dm = DistanceMatrix::from_coordinates(&points);
                let demands: Vec<f64> = (0..points.len())
                    .map(|i| if i == 0 { 0.0 } else { f64::from(raw_demands[i]) })
                    .collect();
                let demands = DemandTable::from_vec(demands);
                let sol = clarke_wright_savings(&dm, &demands, capacity).expect("valid");

                let evaluator = RouteEvaluator::new(&dm, &demands, capacity);
                let violations = evaluator.evaluate_solution(&sol);
                prop_assert!(violations.is_empty(), "{:?}", violations);
                prop_assert_eq!(sol.num_served(), points.len() - 1);
                for route in sol.routes() {
                    prop_assert!(route.load() <= capacity);
                    prop_assert!(route.is_round_trip(0));
                }
            }
        }
    }
}
