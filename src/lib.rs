//! Constrained multi-resource allocation.
//!
//! For one scheduling slot, chooses how many integral units to draw from
//! each of several capacity- and availability-limited resources so that
//! total supply falls inside a tolerance band around the demand, total
//! cost is minimal, and discouraged resources are only used when the band
//! cannot be met without them.
//!
//! - **Allocation**: the per-slot engine. Scenario planning, a dense
//!   dynamic-programming state table, feasibility selection and
//!   backtrace reconstruction.
//! - **Schedule**: solves a sequence of slots independently (optionally
//!   in parallel) and aggregates totals.
//! - **Presets**: a small three-source district grid for demos and tests.
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for catalogs, scenarios and reports.
//! - `parallel`: solve schedule slots concurrently with rayon.
//!
//! # Example
//!
//! ```
//! use u_gridalloc::allocation::{AllocationConfig, AllocationOutcome, AllocationRunner, Scenario};
//! use u_gridalloc::presets;
//!
//! let catalog = presets::energy_grid();
//! let scenario = Scenario::new(19, 92.0).with_tolerance(0.10);
//!
//! match AllocationRunner::run(&catalog, &scenario, &AllocationConfig::default()).unwrap() {
//!     AllocationOutcome::Allocated(a) => {
//!         assert_eq!(a.units("Hydro"), 40);
//!         assert_eq!(a.units("Diesel"), 42);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

pub mod allocation;
pub mod presets;
pub mod schedule;
