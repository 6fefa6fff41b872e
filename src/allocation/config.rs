//! Engine configuration.

/// Default flat penalty for using any unit of a discouraged resource.
pub const DEFAULT_DISCOURAGED_PENALTY: f64 = 1000.0;

/// Default upper bound on the number of state-table cells.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 16_000_000;

/// Configuration for a single allocation evaluation.
///
/// # Examples
///
/// ```
/// use u_gridalloc::allocation::AllocationConfig;
///
/// let config = AllocationConfig::default()
///     .with_discouraged_penalty(500.0)
///     .with_max_table_cells(1_000_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AllocationConfig {
    /// Flat penalty added once per slot for each discouraged resource
    /// that supplies at least one unit.
    pub discouraged_penalty: f64,

    /// Maximum number of cells the state table may occupy.
    ///
    /// Evaluations whose table would exceed this fail with
    /// `TableTooLarge` instead of allocating.
    pub max_table_cells: usize,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            discouraged_penalty: DEFAULT_DISCOURAGED_PENALTY,
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

impl AllocationConfig {
    pub fn with_discouraged_penalty(mut self, penalty: f64) -> Self {
        self.discouraged_penalty = penalty;
        self
    }

    pub fn with_max_table_cells(mut self, cells: usize) -> Self {
        self.max_table_cells = cells;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.discouraged_penalty.is_finite() || self.discouraged_penalty < 0.0 {
            return Err(format!(
                "discouraged_penalty must be finite and non-negative, got {}",
                self.discouraged_penalty
            ));
        }
        if self.max_table_cells == 0 {
            return Err("max_table_cells must be at least 1".into());
        }
        Ok(())
    }
}
