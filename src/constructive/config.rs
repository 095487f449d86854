//! Clarke-Wright solver configuration.

/// How route costs are refreshed after each processed saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostUpdate {
    /// Recompute the cost of every route after every saving.
    #[default]
    Full,

    /// Recompute only the routes holding the current saving's two customers.
    ///
    /// Every route touched by an iteration contains one of them, so the
    /// final costs are identical to [`CostUpdate::Full`].
    Incremental,
}

/// Configuration for the Clarke-Wright savings solver.
///
/// # Examples
///
/// ```
/// use u_savings::constructive::{ClarkeWrightConfig, CostUpdate};
///
/// let config = ClarkeWrightConfig::default()
///     .with_min_saving(0.0)
///     .with_cost_update(CostUpdate::Incremental);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClarkeWrightConfig {
    /// Savings with `value <= min_saving` are dropped before the run.
    ///
    /// `None` evaluates every customer pair.
    pub min_saving: Option<f64>,

    /// Cost refresh strategy.
    pub cost_update: CostUpdate,
}

impl ClarkeWrightConfig {
    pub fn with_min_saving(mut self, threshold: f64) -> Self {
        self.min_saving = Some(threshold);
        self
    }

    pub fn with_cost_update(mut self, cost_update: CostUpdate) -> Self {
        self.cost_update = cost_update;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(threshold) = self.min_saving {
            if threshold.is_nan() {
                return Err("min_saving must not be NaN".into());
            }
        }
        Ok(())
    }
}
