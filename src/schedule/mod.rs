//! Per-slot schedule runner.
//!
//! Sums district demands for each slot, solves every slot independently
//! with the allocation engine and aggregates the results. Slots share
//! nothing but the read-only catalog; with the `parallel` feature they
//! can be solved concurrently.
//!
//! Solving slots independently does not give a globally optimal
//! multi-slot schedule, and no constraint links one slot to the next.

mod config;
mod runner;
mod types;

pub use config::ScheduleConfig;
pub use runner::ScheduleRunner;
pub use types::{
    DistrictDemand, ScheduleReport, ScheduleSummary, SlotDemand, SlotReport, SlotStatus,
};
