//! Scenario construction: available resources and the feasible band.

use super::types::{Catalog, Resource, Slot};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default fractional tolerance around the demand.
pub const DEFAULT_TOLERANCE: f64 = 0.10;

/// Inclusive range of acceptable total supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupplyBand {
    /// Smallest acceptable total.
    pub min: u32,
    /// Largest acceptable total.
    pub max: u32,
}

impl SupplyBand {
    /// Derives the band `[floor(d * (1 - t)), floor(d * (1 + t))]`.
    ///
    /// Bounds above `u32::MAX` saturate. [`Scenario::validate`] rejects
    /// demands whose upper bound does not fit.
    ///
    /// ```
    /// use u_gridalloc::allocation::SupplyBand;
    ///
    /// let band = SupplyBand::from_demand(30.0, 0.10);
    /// assert_eq!((band.min, band.max), (27, 33));
    /// ```
    pub fn from_demand(demand: f64, tolerance: f64) -> Self {
        Self {
            min: (demand * (1.0 - tolerance)).floor() as u32,
            max: (demand * (1.0 + tolerance)).floor() as u32,
        }
    }

    pub fn contains(&self, units: u32) -> bool {
        (self.min..=self.max).contains(&units)
    }
}

/// One allocation request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scenario {
    /// Slot being solved.
    pub slot: Slot,

    /// Target aggregate quantity.
    pub demand: f64,

    /// Fractional band width in `[0, 1]`.
    pub tolerance: f64,
}

impl Scenario {
    /// Creates a scenario with [`DEFAULT_TOLERANCE`].
    pub fn new(slot: Slot, demand: f64) -> Self {
        Self {
            slot,
            demand,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn band(&self) -> SupplyBand {
        SupplyBand::from_demand(self.demand, self.tolerance)
    }

    /// Validates the scenario.
    pub fn validate(&self) -> Result<(), String> {
        if !self.demand.is_finite() || self.demand < 0.0 {
            return Err(format!(
                "demand must be finite and non-negative, got {}",
                self.demand
            ));
        }
        if !self.tolerance.is_finite() || !(0.0..=1.0).contains(&self.tolerance) {
            return Err(format!(
                "tolerance must be in [0, 1], got {}",
                self.tolerance
            ));
        }
        if self.demand * (1.0 + self.tolerance) > u32::MAX as f64 {
            return Err(format!(
                "demand {} with tolerance {} exceeds the supported supply range",
                self.demand, self.tolerance
            ));
        }
        Ok(())
    }
}

/// Resources selected for one slot, in processing order, plus the band.
#[derive(Debug, Clone)]
pub(crate) struct ScenarioPlan<'a> {
    pub slot: Slot,
    pub band: SupplyBand,
    pub resources: Vec<&'a Resource>,
    /// Sum of the capacities of `resources`.
    pub max_supply: u64,
}

impl<'a> ScenarioPlan<'a> {
    /// Filters `catalog` to the resources available in the scenario's slot.
    ///
    /// Resources are ordered by ascending unit cost; equal costs keep
    /// catalog order. The order only fixes the trace, it plays no part in
    /// optimality. Returns `None` when nothing is available in the slot.
    pub fn build(catalog: &'a Catalog, scenario: &Scenario) -> Option<Self> {
        let mut resources: Vec<&Resource> = catalog.available_in(scenario.slot).collect();
        if resources.is_empty() {
            return None;
        }
        resources.sort_by(|a, b| a.unit_cost.total_cmp(&b.unit_cost));

        let max_supply = resources.iter().map(|r| u64::from(r.capacity)).sum();

        Some(Self {
            slot: scenario.slot,
            band: scenario.band(),
            resources,
            max_supply,
        })
    }

    /// Number of cumulative-unit columns the state table needs.
    ///
    /// Supply never decreases along a chain, so nothing above `band.max`
    /// can become feasible.
    pub fn table_width(&self) -> usize {
        self.max_supply.min(u64::from(self.band.max)) as usize + 1
    }
}
