//! Feasibility selector.

use super::scenario::SupplyBand;
use super::table::StateTable;

/// Terminal state chosen for reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TerminalState {
    pub cumulative: u32,
    pub cost: f64,
}

/// Picks the cheapest terminal state whose supply lies inside `band`.
///
/// Terminal states are those in the last row. Ties go to the lowest
/// cumulative supply. Returns `None` when the band is unreachable.
pub(crate) fn select_terminal(table: &StateTable, band: SupplyBand) -> Option<TerminalState> {
    let last = table.rows().checked_sub(1)?;
    let mut best: Option<TerminalState> = None;

    for (cumulative, cost) in table.reached(last) {
        let cumulative = cumulative as u32;
        if !band.contains(cumulative) {
            continue;
        }
        if best.is_none_or(|b| cost < b.cost) {
            best = Some(TerminalState { cumulative, cost });
        }
    }

    best
}
