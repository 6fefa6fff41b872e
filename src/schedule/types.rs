//! Demand inputs and per-slot reports.

use crate::allocation::{Allocation, AllocationError, Slot, SupplyBand};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Demand of one district in one slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictDemand {
    pub name: String,
    pub demand: f64,
}

/// All district demands for one slot.
///
/// ```
/// use u_gridalloc::schedule::SlotDemand;
///
/// let hour = SlotDemand::new(6)
///     .with_district("A", 20.0)
///     .with_district("B", 15.0);
/// assert_eq!(hour.total(), 35.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotDemand {
    pub slot: Slot,
    pub districts: Vec<DistrictDemand>,
}

impl SlotDemand {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            districts: Vec::new(),
        }
    }

    pub fn with_district(mut self, name: impl Into<String>, demand: f64) -> Self {
        self.districts.push(DistrictDemand {
            name: name.into(),
            demand,
        });
        self
    }

    /// Aggregate demand of the slot.
    pub fn total(&self) -> f64 {
        self.districts.iter().map(|d| d.demand).sum()
    }
}

/// What happened to one slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SlotStatus {
    Allocated(Allocation),

    /// No resource was available in the slot.
    NoResources,

    /// Available resources cannot reach the band.
    Unmet { band: SupplyBand, max_supply: u64 },

    /// The evaluation of this slot failed; other slots are unaffected.
    Failed(AllocationError),
}

/// Result for one slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotReport {
    pub slot: Slot,
    pub demand: f64,
    pub status: SlotStatus,
}

impl SlotReport {
    pub fn allocation(&self) -> Option<&Allocation> {
        match &self.status {
            SlotStatus::Allocated(a) => Some(a),
            _ => None,
        }
    }
}

/// Aggregates over all slots of a schedule.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleSummary {
    /// Units supplied across all allocated slots.
    pub total_supplied: u64,

    /// Units supplied by resources that are not discouraged.
    pub preferred_supplied: u64,

    /// `preferred_supplied / total_supplied` in percent (0 if nothing supplied).
    pub preferred_share: f64,

    /// Sum of allocation costs, penalties included.
    pub total_cost: f64,

    /// Slots that drew on a discouraged resource, ascending and unique.
    pub discouraged_slots: Vec<Slot>,

    /// Slots with no available resource or an unreachable band.
    pub unmet_slots: Vec<Slot>,

    /// Slots whose evaluation failed.
    pub failed_slots: Vec<Slot>,
}

/// Per-slot reports, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleReport {
    pub slots: Vec<SlotReport>,
}

impl ScheduleReport {
    /// Computes the schedule-wide aggregates.
    pub fn summary(&self) -> ScheduleSummary {
        let mut summary = ScheduleSummary::default();

        for report in &self.slots {
            match &report.status {
                SlotStatus::Allocated(a) => {
                    summary.total_supplied += u64::from(a.total_units());
                    summary.preferred_supplied += u64::from(a.preferred_units());
                    summary.total_cost += a.total_cost;
                    if a.uses_discouraged() {
                        summary.discouraged_slots.push(report.slot);
                    }
                }
                SlotStatus::NoResources | SlotStatus::Unmet { .. } => {
                    summary.unmet_slots.push(report.slot)
                }
                SlotStatus::Failed(_) => summary.failed_slots.push(report.slot),
            }
        }

        summary.discouraged_slots.sort_unstable();
        summary.discouraged_slots.dedup();
        if summary.total_supplied > 0 {
            summary.preferred_share =
                summary.preferred_supplied as f64 / summary.total_supplied as f64 * 100.0;
        }
        summary
    }
}
