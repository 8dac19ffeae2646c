//! The transition engine.
//!
//! Every cell of the next generation is computed from the *previous*
//! generation only; the source grid is never written to.

use crate::grid::Grid;
use crate::rule::RuleSet;

/// Computes the next generation.
///
/// Pure: the same grid and rule always produce the same result, and the
/// input is left untouched.
pub fn step(grid: &Grid, rules: &RuleSet) -> Grid {
    let mut next = Grid::new(grid.width(), grid.height());
    step_into(grid, rules, &mut next);
    next
}

/// Computes the next generation into an existing buffer.
///
/// Every cell of `next` is overwritten, so its previous contents do not
/// matter.
///
/// # Panics
///
/// Panics if `next` has different dimensions than `grid`.
pub fn step_into(grid: &Grid, rules: &RuleSet, next: &mut Grid) {
    assert_eq!(
        grid.dimensions(),
        next.dimensions(),
        "step buffers must have matching dimensions"
    );

    let width = grid.width();
    let cells = grid.cells();
    let out = next.cells_mut();

    for y in 0..grid.height() {
        for x in 0..width {
            let i = y * width + x;
            out[i] = rules.next_state(cells[i], grid.neighbor_count(x, y));
        }
    }
}

/// Double-buffered stepper.
///
/// Keeps a scratch grid so that repeated stepping allocates nothing after
/// the first call.
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    scratch: Option<Grid>,
}

impl Stepper {
    /// Creates a stepper with no scratch buffer yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances `grid` in place by one generation.
    pub fn advance(&mut self, grid: &mut Grid, rules: &RuleSet) {
        let mut next = self.take_buffer(grid.width(), grid.height());
        step_into(grid, rules, &mut next);
        std::mem::swap(grid, &mut next);
        self.scratch = Some(next);
    }

    /// Advances `grid` in place by `n` generations.
    pub fn advance_by(&mut self, grid: &mut Grid, rules: &RuleSet, n: usize) {
        for _ in 0..n {
            self.advance(grid, rules);
        }
    }

    /// Hands a buffer back for reuse by later steps.
    pub fn recycle(&mut self, grid: Grid) {
        self.scratch = Some(grid);
    }

    /// Takes a buffer of the requested size, reusing the scratch grid when
    /// its dimensions match.
    pub fn take_buffer(&mut self, width: usize, height: usize) -> Grid {
        match self.scratch.take() {
            Some(grid) if grid.dimensions() == (width, height) => grid,
            _ => Grid::new(width, height),
        }
    }
}
