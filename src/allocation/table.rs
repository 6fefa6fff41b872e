//! Dense state table for the allocation dynamic program.

/// How a state was reached from the previous row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Predecessor {
    /// Index of the resource folded in (equals the previous row index).
    pub resource: usize,
    /// Units drawn from that resource.
    pub units: u32,
    /// Cumulative units in the previous row.
    pub previous: u32,
}

/// Arena of `(resource_index, cumulative_units)` cells.
///
/// Row `k` holds the states after the first `k` resources have been
/// considered. Unreached cells hold `f64::INFINITY` and no predecessor.
#[derive(Debug, Clone)]
pub(crate) struct StateTable {
    rows: usize,
    width: usize,
    costs: Vec<f64>,
    links: Vec<Option<Predecessor>>,
}

impl StateTable {
    /// Allocates `rows x width` cells with the base state `(0, 0)` at cost 0.
    pub fn new(rows: usize, width: usize) -> Self {
        let cells = rows * width;
        let mut costs = vec![f64::INFINITY; cells];
        if cells > 0 {
            costs[0] = 0.0;
        }
        Self {
            rows,
            width,
            costs,
            links: vec![None; cells],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, row: usize, cumulative: usize) -> usize {
        debug_assert!(row < self.rows && cumulative < self.width);
        row * self.width + cumulative
    }

    /// Minimum cost recorded for a cell (`INFINITY` when unreached).
    pub fn cost(&self, row: usize, cumulative: usize) -> f64 {
        self.costs[self.index(row, cumulative)]
    }

    pub fn predecessor(&self, row: usize, cumulative: usize) -> Option<Predecessor> {
        self.links[self.index(row, cumulative)]
    }

    /// Records `cost` for a cell if it is strictly cheaper than the
    /// current entry. Returns whether the cell changed.
    pub fn relax(&mut self, row: usize, cumulative: usize, cost: f64, via: Predecessor) -> bool {
        let idx = self.index(row, cumulative);
        if cost < self.costs[idx] {
            self.costs[idx] = cost;
            self.links[idx] = Some(via);
            true
        } else {
            false
        }
    }

    /// Reached cells of `row` as `(cumulative, cost)`, ascending.
    pub fn reached(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = row * self.width;
        self.costs[start..start + self.width]
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_finite())
            .map(|(cumulative, &c)| (cumulative, c))
    }

    #[cfg(test)]
    pub fn clear_link(&mut self, row: usize, cumulative: usize) {
        let idx = self.index(row, cumulative);
        self.links[idx] = None;
    }

    #[cfg(test)]
    pub fn set_link(&mut self, row: usize, cumulative: usize, via: Predecessor) {
        let idx = self.index(row, cumulative);
        self.links[idx] = Some(via);
    }
}
