//! Constrained multi-resource allocation for a single slot.
//!
//! Chooses how many integral units to draw from each available resource
//! so that the total lands in a tolerance band around the demand, at
//! minimum cost. Discouraged resources carry a flat per-slot penalty and
//! are only drawn on when the band cannot be met otherwise.
//!
//! # Pipeline
//!
//! 1. **Scenario planning**: filter the catalog by slot availability,
//!    order by unit cost, derive the band `[floor(d(1-t)), floor(d(1+t))]`.
//! 2. **State transitions**: fill a dense table
//!    `(resources considered, cumulative units) -> min cost` one resource
//!    row at a time.
//! 3. **Selection**: cheapest terminal state inside the band.
//! 4. **Backtrace**: follow predecessor links to recover unit counts.
//!
//! Each evaluation owns its table; the [`Catalog`] is shared read-only,
//! so independent slots can be solved concurrently.
//!
//! # References
//!
//! Bounded knapsack dynamic programming: Kellerer, Pferschy & Pisinger
//! (2004), "Knapsack Problems", ch. 7.

mod backtrace;
mod config;
mod engine;
mod error;
mod runner;
mod scenario;
mod selector;
mod table;
mod types;

pub use config::{AllocationConfig, DEFAULT_DISCOURAGED_PENALTY, DEFAULT_MAX_TABLE_CELLS};
pub use error::AllocationError;
pub use runner::{Allocation, AllocationOutcome, AllocationRunner, ResourceAllocation};
pub use scenario::{Scenario, SupplyBand, DEFAULT_TOLERANCE};
pub use types::{Availability, Catalog, Resource, Slot};
