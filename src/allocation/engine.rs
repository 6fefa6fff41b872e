//! State-transition engine.
//!
//! Folds resources into the table one row at a time. Row `i + 1` depends
//! only on row `i`, so the fold is inherently sequential.

use super::error::AllocationError;
use super::scenario::ScenarioPlan;
use super::table::{Predecessor, StateTable};

/// Builds the complete state table for `plan`.
///
/// For every reached state `(i, prev)` and every `used` in
/// `0..=capacity` of resource `i`:
///
/// ```text
/// cost(i + 1, prev + used) = cost(i, prev) + used * unit_cost + penalty
/// ```
///
/// where `penalty` is `discouraged_penalty` when the resource is
/// discouraged and `used > 0`. Only strictly cheaper costs overwrite a
/// cell, so ties keep the earliest predecessor (ascending `prev`, then
/// ascending `used`).
///
/// The result does not depend on the order of `plan.resources`: the
/// units drawn from each resource are chosen independently.
pub(crate) fn build_table(
    plan: &ScenarioPlan<'_>,
    discouraged_penalty: f64,
    max_table_cells: usize,
) -> Result<StateTable, AllocationError> {
    let rows = plan.resources.len() + 1;
    let width = plan.table_width();
    let required = rows
        .checked_mul(width)
        .ok_or(AllocationError::TableTooLarge {
            required: usize::MAX,
            limit: max_table_cells,
        })?;
    if required > max_table_cells {
        return Err(AllocationError::TableTooLarge {
            required,
            limit: max_table_cells,
        });
    }

    let mut table = StateTable::new(rows, width);
    // Highest reachable cumulative in the current row.
    let mut frontier = 0usize;

    for (i, resource) in plan.resources.iter().enumerate() {
        let unit_cost = resource.unit_cost;
        let capacity = resource.capacity as usize;

        for prev in 0..=frontier {
            let prev_cost = table.cost(i, prev);
            if !prev_cost.is_finite() {
                continue;
            }

            let max_used = capacity.min(width - 1 - prev);
            for used in 0..=max_used {
                let penalty = if resource.discouraged && used > 0 {
                    discouraged_penalty
                } else {
                    0.0
                };
                let new_cost = prev_cost + used as f64 * unit_cost + penalty;

                table.relax(
                    i + 1,
                    prev + used,
                    new_cost,
                    Predecessor {
                        resource: i,
                        units: used as u32,
                        previous: prev as u32,
                    },
                );
            }
        }

        frontier = (frontier + capacity).min(width - 1);
    }

    Ok(table)
}
