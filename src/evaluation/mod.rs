//! Route cost/load evaluation and solution feasibility checking.

mod evaluator;

pub use evaluator::RouteEvaluator;
