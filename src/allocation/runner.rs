//! Allocation pipeline: plan, fold, select, reconstruct.

use super::backtrace::reconstruct;
use super::config::AllocationConfig;
use super::engine::build_table;
use super::error::AllocationError;
use super::scenario::{Scenario, ScenarioPlan, SupplyBand};
use super::selector::select_terminal;
use super::types::{Catalog, Slot};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Units drawn from one resource.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResourceAllocation {
    pub name: String,
    pub units: u32,
    pub unit_cost: f64,
    pub discouraged: bool,
}

/// A feasible, cost-minimal allocation for one slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Allocation {
    /// Slot that was solved.
    pub slot: Slot,

    /// Band the total supply was required to fall in.
    pub band: SupplyBand,

    /// One entry per available resource, in processing order
    /// (ascending unit cost). Unused resources appear with 0 units.
    pub resources: Vec<ResourceAllocation>,

    /// Minimum cost, penalties included.
    pub total_cost: f64,
}

impl Allocation {
    /// Units drawn from the named resource (0 if it was not available).
    pub fn units(&self, name: &str) -> u32 {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .map_or(0, |r| r.units)
    }

    pub fn total_units(&self) -> u32 {
        self.resources.iter().map(|r| r.units).sum()
    }

    /// Units drawn from resources that are not discouraged.
    pub fn preferred_units(&self) -> u32 {
        self.resources
            .iter()
            .filter(|r| !r.discouraged)
            .map(|r| r.units)
            .sum()
    }

    /// Cost excluding penalties.
    pub fn variable_cost(&self) -> f64 {
        self.resources
            .iter()
            .map(|r| r.units as f64 * r.unit_cost)
            .sum()
    }

    /// Discouraged resources that supplied at least one unit.
    pub fn penalized_resources(&self) -> impl Iterator<Item = &ResourceAllocation> {
        self.resources
            .iter()
            .filter(|r| r.discouraged && r.units > 0)
    }

    pub fn uses_discouraged(&self) -> bool {
        self.penalized_resources().next().is_some()
    }
}

/// Result of one allocation evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AllocationOutcome {
    /// The band is reachable; cheapest allocation attached.
    Allocated(Allocation),

    /// No resource is available in the slot. The engine was not run.
    EmptyCatalog { slot: Slot },

    /// No combination of available resources lands inside the band.
    Infeasible {
        slot: Slot,
        band: SupplyBand,
        /// Sum of the capacities available in the slot.
        max_supply: u64,
    },
}

impl AllocationOutcome {
    pub fn allocation(&self) -> Option<&Allocation> {
        match self {
            AllocationOutcome::Allocated(a) => Some(a),
            _ => None,
        }
    }

    pub fn into_allocation(self) -> Option<Allocation> {
        match self {
            AllocationOutcome::Allocated(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated(_))
    }
}

/// Executes the allocation pipeline for one scenario.
///
/// # Examples
///
/// ```
/// use u_gridalloc::allocation::{AllocationConfig, AllocationRunner, Catalog, Resource, Scenario};
///
/// let catalog = Catalog::default()
///     .with_resource(Resource::new("Solar", 50, 1.0))
///     .with_resource(Resource::new("Hydro", 40, 1.5));
/// let scenario = Scenario::new(12, 60.0).with_tolerance(0.0);
///
/// let outcome = AllocationRunner::run(&catalog, &scenario, &AllocationConfig::default()).unwrap();
/// assert!(outcome.is_allocated());
/// let allocation = outcome.into_allocation().unwrap();
/// assert_eq!(allocation.units("Solar"), 50);
/// assert_eq!(allocation.units("Hydro"), 10);
/// assert!((allocation.total_cost - 65.0).abs() < 1e-10);
/// ```
pub struct AllocationRunner;

impl AllocationRunner {
    /// Validates all inputs, then solves the scenario.
    pub fn run(
        catalog: &Catalog,
        scenario: &Scenario,
        config: &AllocationConfig,
    ) -> Result<AllocationOutcome, AllocationError> {
        catalog.validate().map_err(AllocationError::InvalidCatalog)?;
        config.validate().map_err(AllocationError::InvalidConfig)?;
        Self::run_validated(catalog, scenario, config)
    }

    /// Solves a scenario against a catalog and config that are already
    /// known to be valid. The scenario itself is still checked.
    #[instrument(name = "allocate", skip_all, fields(slot = scenario.slot, demand = scenario.demand))]
    pub(crate) fn run_validated(
        catalog: &Catalog,
        scenario: &Scenario,
        config: &AllocationConfig,
    ) -> Result<AllocationOutcome, AllocationError> {
        scenario.validate().map_err(AllocationError::InvalidScenario)?;

        let Some(plan) = ScenarioPlan::build(catalog, scenario) else {
            debug!("no resource available");
            return Ok(AllocationOutcome::EmptyCatalog {
                slot: scenario.slot,
            });
        };
        debug!(
            resources = plan.resources.len(),
            band_min = plan.band.min,
            band_max = plan.band.max,
            max_supply = plan.max_supply,
            "scenario planned"
        );

        let table = build_table(&plan, config.discouraged_penalty, config.max_table_cells)?;
        debug!(rows = table.rows(), width = table.width(), "state table built");

        let Some(terminal) = select_terminal(&table, plan.band) else {
            debug!("no terminal state inside the band");
            return Ok(AllocationOutcome::Infeasible {
                slot: plan.slot,
                band: plan.band,
                max_supply: plan.max_supply,
            });
        };
        debug!(
            cumulative = terminal.cumulative,
            cost = terminal.cost,
            "terminal state selected"
        );

        let resources = reconstruct(&table, &plan, terminal).inspect_err(|e| {
            error!(error = %e, "backtrace failed");
        })?;

        Ok(AllocationOutcome::Allocated(Allocation {
            slot: plan.slot,
            band: plan.band,
            resources,
            total_cost: terminal.cost,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::config::DEFAULT_DISCOURAGED_PENALTY;
    use crate::allocation::{Availability, Resource};
    use proptest::prelude::*;

    fn run(catalog: &Catalog, scenario: &Scenario) -> AllocationOutcome {
        AllocationRunner::run(catalog, scenario, &AllocationConfig::default()).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn test_cheapest_first_fill() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Solar", 50, 1.0))
            .with_resource(Resource::new("Hydro", 40, 1.5));
        let outcome = run(&catalog, &Scenario::new(0, 60.0).with_tolerance(0.0));

        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.units("Solar"), 50);
        assert_eq!(allocation.units("Hydro"), 10);
        assert_eq!(allocation.total_units(), 60);
        assert_close(allocation.total_cost, 65.0);
        assert!(!allocation.uses_discouraged());
    }

    #[test]
    fn test_discouraged_only_resource() {
        let catalog = Catalog::default().with_resource(Resource::new("Diesel", 60, 3.0).discouraged());
        let outcome = run(&catalog, &Scenario::new(0, 30.0).with_tolerance(0.10));

        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.band, SupplyBand { min: 27, max: 33 });
        let diesel = allocation.units("Diesel");
        assert!((27..=33).contains(&diesel));
        assert_close(
            allocation.total_cost,
            diesel as f64 * 3.0 + DEFAULT_DISCOURAGED_PENALTY,
        );
        assert!(allocation.uses_discouraged());
        // cheapest point in the band is its lower edge
        assert_eq!(diesel, 27);
    }

    #[test]
    fn test_infeasible_when_capacity_short() {
        let catalog = Catalog::default().with_resource(Resource::new("Solar", 10, 1.0));
        let outcome = run(&catalog, &Scenario::new(0, 50.0).with_tolerance(0.0));

        assert_eq!(
            outcome,
            AllocationOutcome::Infeasible {
                slot: 0,
                band: SupplyBand { min: 50, max: 50 },
                max_supply: 10,
            }
        );
        assert!(outcome.allocation().is_none());
        assert!(!outcome.is_allocated());
    }

    #[test]
    fn test_empty_catalog_for_slot() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Solar", 50, 1.0).with_availability(Availability::window(6, 18)));
        let outcome = run(&catalog, &Scenario::new(2, 10.0));
        assert_eq!(outcome, AllocationOutcome::EmptyCatalog { slot: 2 });
        assert!(!outcome.is_allocated());
        assert!(outcome.into_allocation().is_none());
    }

    #[test]
    fn test_outcome_accessors() {
        let catalog = Catalog::default().with_resource(Resource::new("Hydro", 40, 1.5));
        let outcome = run(&catalog, &Scenario::new(3, 20.0).with_tolerance(0.0));

        assert!(outcome.is_allocated());
        let borrowed = outcome.allocation().cloned();
        let owned = outcome.into_allocation().unwrap();
        assert_eq!(borrowed, Some(owned.clone()));
        assert_eq!(owned.slot, 3);
        assert_eq!(owned.units("Hydro"), 20);
        assert_close(owned.total_cost, 30.0);

        let infeasible = run(&catalog, &Scenario::new(3, 80.0).with_tolerance(0.0));
        assert!(!infeasible.is_allocated());
        assert!(infeasible.into_allocation().is_none());
    }

    #[test]
    fn test_zero_demand() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Solar", 50, 1.0))
            .with_resource(Resource::new("Diesel", 60, 3.0).discouraged());
        let outcome = run(&catalog, &Scenario::new(0, 0.0));

        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.total_units(), 0);
        assert_close(allocation.total_cost, 0.0);
        assert_eq!(allocation.resources.len(), 2);
    }

    #[test]
    fn test_diesel_avoided_when_renewables_suffice() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Diesel", 60, 3.0).discouraged())
            .with_resource(Resource::new("Hydro", 40, 1.5));
        // band [31, 38] is coverable by Hydro alone
        let outcome = run(&catalog, &Scenario::new(0, 35.0));

        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.units("Diesel"), 0);
        assert_eq!(allocation.units("Hydro"), 31);
    }

    #[test]
    fn test_diesel_used_when_structurally_required() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Diesel", 60, 3.0).discouraged())
            .with_resource(Resource::new("Hydro", 40, 1.5));
        let outcome = run(&catalog, &Scenario::new(0, 92.0));

        // band [82, 101]: Hydro 40 + Diesel 42
        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.units("Hydro"), 40);
        assert_eq!(allocation.units("Diesel"), 42);
        assert_close(allocation.total_cost, 40.0 * 1.5 + 42.0 * 3.0 + 1000.0);
        assert_eq!(allocation.penalized_resources().count(), 1);
        assert_close(allocation.variable_cost(), 186.0);
    }

    #[test]
    fn test_unavailable_resource_reports_zero() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Solar", 50, 1.0).with_availability(Availability::window(6, 18)))
            .with_resource(Resource::new("Hydro", 40, 1.5));
        let outcome = run(&catalog, &Scenario::new(20, 30.0));

        let allocation = outcome.allocation().unwrap();
        assert_eq!(allocation.units("Solar"), 0);
        assert_eq!(allocation.resources.len(), 1);
    }

    #[test]
    fn test_invalid_inputs() {
        let catalog = Catalog::default().with_resource(Resource::new("Solar", 50, 1.0));
        let config = AllocationConfig::default();

        let err = AllocationRunner::run(&catalog, &Scenario::new(0, -5.0), &config).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidScenario(_)));

        let bad = AllocationConfig::default().with_discouraged_penalty(-1.0);
        let err = AllocationRunner::run(&catalog, &Scenario::new(0, 5.0), &bad).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidConfig(_)));

        let dup = catalog.clone().with_resource(Resource::new("Solar", 1, 1.0));
        let err = AllocationRunner::run(&dup, &Scenario::new(0, 5.0), &config).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidCatalog(_)));
    }

    #[test]
    fn test_demand_beyond_supply_range() {
        let catalog = Catalog::default().with_resource(Resource::new("Solar", u32::MAX, 1.0));
        let config = AllocationConfig::default();
        let err = AllocationRunner::run(&catalog, &Scenario::new(0, 5e9), &config).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidScenario(_)));
        assert!(!err.is_defect());
    }

    #[test]
    fn test_table_limit_reported() {
        let catalog = Catalog::default().with_resource(Resource::new("Solar", 500, 1.0));
        let config = AllocationConfig::default().with_max_table_cells(100);
        let err = AllocationRunner::run(&catalog, &Scenario::new(0, 400.0), &config).unwrap_err();
        assert!(matches!(err, AllocationError::TableTooLarge { .. }));
        assert!(!err.is_defect());
    }

    #[test]
    fn test_idempotent() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("A", 7, 1.0))
            .with_resource(Resource::new("B", 7, 1.0))
            .with_resource(Resource::new("C", 7, 1.0).discouraged());
        let scenario = Scenario::new(0, 12.0);
        let first = run(&catalog, &scenario);
        let second = run(&catalog, &scenario);
        assert_eq!(first, second);
    }

    // ---- Property tests ----

    fn brute_force_optimum(catalog: &Catalog, band: SupplyBand, penalty: f64) -> Option<f64> {
        let resources = catalog.resources();
        let mut best: Option<f64> = None;
        let mut units = vec![0u32; resources.len()];
        loop {
            let total: u32 = units.iter().sum();
            if band.contains(total) {
                let cost: f64 = resources
                    .iter()
                    .zip(&units)
                    .map(|(r, &u)| {
                        u as f64 * r.unit_cost + if r.discouraged && u > 0 { penalty } else { 0.0 }
                    })
                    .sum();
                if best.is_none_or(|b| cost < b) {
                    best = Some(cost);
                }
            }
            // odometer increment
            let mut i = 0;
            loop {
                if i == units.len() {
                    return best;
                }
                if units[i] < resources[i].capacity {
                    units[i] += 1;
                    break;
                }
                units[i] = 0;
                i += 1;
            }
        }
    }

    fn arb_catalog() -> impl Strategy<Value = Catalog> {
        prop::collection::vec((0u32..8, 0u32..20, any::<bool>()), 1..4).prop_map(|specs| {
            Catalog::new(
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (capacity, cost_tenths, discouraged))| {
                        let r = Resource::new(format!("R{i}"), capacity, cost_tenths as f64 / 10.0);
                        if discouraged {
                            r.discouraged()
                        } else {
                            r
                        }
                    })
                    .collect(),
            )
        })
    }

    fn arb_scenario() -> impl Strategy<Value = Scenario> {
        (0u32..25, prop::sample::select(vec![0.0, 0.05, 0.1, 0.25]))
            .prop_map(|(demand, tolerance)| Scenario::new(0, demand as f64).with_tolerance(tolerance))
    }

    proptest! {
        #[test]
        fn prop_cost_matches_units_and_penalties(catalog in arb_catalog(), scenario in arb_scenario()) {
            let outcome = run(&catalog, &scenario);
            if let AllocationOutcome::Allocated(a) = outcome {
                let penalties = a.penalized_resources().count() as f64 * DEFAULT_DISCOURAGED_PENALTY;
                prop_assert!((a.total_cost - (a.variable_cost() + penalties)).abs() < 1e-6);
                prop_assert!(a.band.contains(a.total_units()));
                for r in &a.resources {
                    let cap = catalog.get(&r.name).map(|c| c.capacity).unwrap_or(0);
                    prop_assert!(r.units <= cap);
                }
            }
        }

        #[test]
        fn prop_matches_brute_force(catalog in arb_catalog(), scenario in arb_scenario()) {
            let outcome = run(&catalog, &scenario);
            let expected = brute_force_optimum(&catalog, scenario.band(), DEFAULT_DISCOURAGED_PENALTY);
            match (outcome, expected) {
                (AllocationOutcome::Allocated(a), Some(cost)) => {
                    prop_assert!((a.total_cost - cost).abs() < 1e-6);
                }
                (AllocationOutcome::Infeasible { .. }, None) => {}
                (other, expected) => {
                    prop_assert!(false, "engine gave {:?}, brute force gave {:?}", other, expected);
                }
            }
        }

        #[test]
        fn prop_capacity_monotone(
            catalog in arb_catalog(),
            scenario in arb_scenario(),
            pick in any::<prop::sample::Index>(),
            extra in 1u32..5,
        ) {
            let before = run(&catalog, &scenario);

            let mut resources = catalog.resources().to_vec();
            let i = pick.index(resources.len());
            resources[i].capacity += extra;
            let after = run(&Catalog::new(resources), &scenario);

            if let AllocationOutcome::Allocated(a) = before {
                let b = after.allocation();
                prop_assert!(b.is_some(), "raising capacity made the scenario infeasible");
                prop_assert!(b.map_or(f64::INFINITY, |b| b.total_cost) <= a.total_cost + 1e-9);
            }
        }

        #[test]
        fn prop_deterministic(catalog in arb_catalog(), scenario in arb_scenario()) {
            prop_assert_eq!(run(&catalog, &scenario), run(&catalog, &scenario));
        }

        #[test]
        fn prop_zero_demand_is_free(catalog in arb_catalog(), tolerance in 0.0f64..1.0) {
            let outcome = run(&catalog, &Scenario::new(0, 0.0).with_tolerance(tolerance));
            let a = outcome.allocation().cloned();
            prop_assert!(a.is_some());
            let a = a.unwrap();
            prop_assert_eq!(a.total_units(), 0);
            prop_assert_eq!(a.total_cost, 0.0);
        }
    }
}
