//! Ready-made catalog and demand table for a small district grid.
//!
//! Three sources feed three districts over four hours. Solar only runs in
//! daylight, diesel only in the evening and is discouraged.

use crate::allocation::{AllocationConfig, Availability, Catalog, Resource};
use crate::schedule::{ScheduleConfig, SlotDemand};

pub use crate::allocation::DEFAULT_TOLERANCE;

/// Flat penalty charged for any diesel use in a slot.
pub const DIESEL_PENALTY: f64 = 1000.0;

/// Solar, Hydro and Diesel.
///
/// | name   | capacity | unit cost | slots    | discouraged |
/// |--------|----------|-----------|----------|-------------|
/// | Solar  | 50       | 1.0       | 6..=18   | no          |
/// | Hydro  | 40       | 1.5       | always   | no          |
/// | Diesel | 60       | 3.0       | 17..=23  | yes         |
pub fn energy_grid() -> Catalog {
    Catalog::default()
        .with_resource(Resource::new("Solar", 50, 1.0).with_availability(Availability::window(6, 18)))
        .with_resource(Resource::new("Hydro", 40, 1.5))
        .with_resource(
            Resource::new("Diesel", 60, 3.0)
                .with_availability(Availability::window(17, 23))
                .discouraged(),
        )
}

/// Schedule settings for [`energy_grid`]: 10% band, [`DIESEL_PENALTY`].
pub fn energy_grid_config() -> ScheduleConfig {
    ScheduleConfig::default()
        .with_tolerance(DEFAULT_TOLERANCE)
        .with_allocation(AllocationConfig::default().with_discouraged_penalty(DIESEL_PENALTY))
}

/// Morning and evening peak demands of districts A, B and C.
pub fn evening_peak_demands() -> Vec<SlotDemand> {
    [
        (6, [20.0, 15.0, 25.0]),
        (7, [22.0, 16.0, 28.0]),
        (18, [30.0, 20.0, 35.0]),
        (19, [32.0, 22.0, 38.0]),
    ]
    .into_iter()
    .map(|(slot, [a, b, c])| {
        SlotDemand::new(slot)
            .with_district("A", a)
            .with_district("B", b)
            .with_district("C", c)
    })
    .collect()
}
