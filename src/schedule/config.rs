//! Schedule configuration.

use crate::allocation::{AllocationConfig, DEFAULT_TOLERANCE};

/// Configuration for a multi-slot schedule run.
///
/// # Examples
///
/// ```
/// use u_gridalloc::allocation::AllocationConfig;
/// use u_gridalloc::schedule::ScheduleConfig;
///
/// let config = ScheduleConfig::default()
///     .with_tolerance(0.05)
///     .with_allocation(AllocationConfig::default().with_discouraged_penalty(250.0))
///     .with_parallel(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Fractional band width applied to every slot's demand.
    pub tolerance: f64,

    /// Engine settings shared by all slots.
    pub allocation: AllocationConfig,

    /// Whether to solve slots in parallel using rayon.
    ///
    /// Only honoured with the `parallel` feature; otherwise slots are
    /// solved sequentially. Report order is the input order either way.
    pub parallel: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            allocation: AllocationConfig::default(),
            parallel: false,
        }
    }
}

impl ScheduleConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_allocation(mut self, allocation: AllocationConfig) -> Self {
        self.allocation = allocation;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance.is_finite() || !(0.0..=1.0).contains(&self.tolerance) {
            return Err(format!("tolerance must be in [0, 1], got {}", self.tolerance));
        }
        self.allocation.validate()
    }
}
