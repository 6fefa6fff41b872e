//! Multi-slot execution loop.

use super::config::ScheduleConfig;
use super::types::{ScheduleReport, SlotDemand, SlotReport, SlotStatus};
use crate::allocation::{AllocationError, AllocationOutcome, AllocationRunner, Catalog, Scenario};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{error, info, instrument, warn};

/// Solves a sequence of slots independently.
///
/// # Examples
///
/// ```
/// use u_gridalloc::presets;
/// use u_gridalloc::schedule::ScheduleRunner;
///
/// let report = ScheduleRunner::run(
///     &presets::energy_grid(),
///     &presets::evening_peak_demands(),
///     &presets::energy_grid_config(),
/// )
/// .unwrap();
///
/// let summary = report.summary();
/// assert_eq!(summary.discouraged_slots, vec![19]);
/// assert!(summary.unmet_slots.is_empty());
/// ```
pub struct ScheduleRunner;

impl ScheduleRunner {
    /// Runs every slot in `demands`.
    ///
    /// Catalog and config are validated once up front; those are the only
    /// errors returned. Per-slot problems (no resources, unreachable band,
    /// evaluation failure) are recorded in the slot's report and never
    /// stop the remaining slots.
    #[instrument(name = "schedule", skip_all, fields(slots = demands.len()))]
    pub fn run(
        catalog: &Catalog,
        demands: &[SlotDemand],
        config: &ScheduleConfig,
    ) -> Result<ScheduleReport, AllocationError> {
        catalog.validate().map_err(AllocationError::InvalidCatalog)?;
        config.validate().map_err(AllocationError::InvalidConfig)?;

        let report = ScheduleReport {
            slots: evaluate_all(catalog, demands, config),
        };

        let summary = report.summary();
        info!(
            total_supplied = summary.total_supplied,
            preferred_share = summary.preferred_share,
            total_cost = summary.total_cost,
            discouraged_slots = ?summary.discouraged_slots,
            unmet_slots = ?summary.unmet_slots,
            "schedule complete"
        );

        Ok(report)
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all(
    catalog: &Catalog,
    demands: &[SlotDemand],
    config: &ScheduleConfig,
) -> Vec<SlotReport> {
    if config.parallel {
        demands
            .par_iter()
            .map(|d| evaluate_slot(catalog, d, config))
            .collect()
    } else {
        demands
            .iter()
            .map(|d| evaluate_slot(catalog, d, config))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(
    catalog: &Catalog,
    demands: &[SlotDemand],
    config: &ScheduleConfig,
) -> Vec<SlotReport> {
    demands
        .iter()
        .map(|d| evaluate_slot(catalog, d, config))
        .collect()
}

/// Solves one slot and folds the outcome into a report.
fn evaluate_slot(catalog: &Catalog, demand: &SlotDemand, config: &ScheduleConfig) -> SlotReport {
    let total = demand.total();
    let scenario = Scenario::new(demand.slot, total).with_tolerance(config.tolerance);

    let status = match AllocationRunner::run_validated(catalog, &scenario, &config.allocation) {
        Ok(AllocationOutcome::Allocated(allocation)) => SlotStatus::Allocated(allocation),
        Ok(AllocationOutcome::EmptyCatalog { slot }) => {
            warn!(slot, "no resource available, demand not satisfied");
            SlotStatus::NoResources
        }
        Ok(AllocationOutcome::Infeasible {
            slot,
            band,
            max_supply,
        }) => {
            warn!(
                slot,
                band_min = band.min,
                band_max = band.max,
                max_supply,
                "demand not satisfied"
            );
            SlotStatus::Unmet { band, max_supply }
        }
        Err(e) => {
            error!(slot = demand.slot, error = %e, defect = e.is_defect(), "slot evaluation failed");
            SlotStatus::Failed(e)
        }
    };

    SlotReport {
        slot: demand.slot,
        demand: total,
        status,
    }
}
