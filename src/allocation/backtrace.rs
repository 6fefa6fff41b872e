//! Backtrace reconstruction of per-resource unit counts.

use super::error::AllocationError;
use super::runner::ResourceAllocation;
use super::scenario::ScenarioPlan;
use super::selector::TerminalState;
use super::table::StateTable;

/// Walks predecessor links from `terminal` back to `(0, 0)`.
///
/// Each step moves up exactly one row, so the walk takes
/// `plan.resources.len()` steps. Returns one entry per planned resource,
/// in processing order, including resources that supply zero units.
pub(crate) fn reconstruct(
    table: &StateTable,
    plan: &ScenarioPlan<'_>,
    terminal: TerminalState,
) -> Result<Vec<ResourceAllocation>, AllocationError> {
    let mut units = vec![0u32; plan.resources.len()];
    let mut row = plan.resources.len();
    let mut cumulative = terminal.cumulative;

    while row > 0 {
        let corrupt = AllocationError::CorruptTrace {
            resource_index: row,
            cumulative,
        };
        let link = table
            .predecessor(row, cumulative as usize)
            .ok_or_else(|| corrupt.clone())?;
        if link.resource != row - 1 || link.previous.checked_add(link.units) != Some(cumulative) {
            return Err(corrupt);
        }

        units[link.resource] = link.units;
        cumulative = link.previous;
        row -= 1;
    }

    if cumulative != 0 {
        return Err(AllocationError::CorruptTrace {
            resource_index: 0,
            cumulative,
        });
    }

    Ok(plan
        .resources
        .iter()
        .zip(units)
        .map(|(resource, units)| ResourceAllocation {
            name: resource.name.clone(),
            units,
            unit_cost: resource.unit_cost,
            discouraged: resource.discouraged,
        })
        .collect())
}
