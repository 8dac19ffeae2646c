//! Well-known seed patterns for Life-like rules.
//!
//! Coordinates are `(x, y)` offsets from the pattern's top-left corner.

/// A named set of live cells that can be stamped onto a [`Grid`](crate::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    name: &'static str,
    cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Creates a pattern from live-cell offsets.
    pub const fn new(name: &'static str, cells: &'static [(usize, usize)]) -> Self {
        Self { name, cells }
    }

    /// Returns the pattern name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the live-cell offsets.
    pub fn cells(&self) -> &'static [(usize, usize)] {
        self.cells
    }

    /// Returns the bounding box `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let w = self.cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let h = self.cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        (w, h)
    }

    /// Returns the number of live cells.
    pub fn population(&self) -> usize {
        self.cells.len()
    }
}

/// Looks a preset up by name, ignoring case and `-`/`_`/space differences.
pub fn by_name(name: &str) -> Option<&'static Pattern> {
    let key = normalize(name);
    ALL.iter().copied().find(|p| normalize(p.name) == key)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Glider - the smallest spaceship, moves one cell diagonally every 4 generations.
pub const GLIDER: Pattern = Pattern::new("Glider", &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);

/// Blinker - period 2 oscillator.
pub const BLINKER: Pattern = Pattern::new("Blinker", &[(0, 0), (1, 0), (2, 0)]);

/// Block - the simplest still life.
pub const BLOCK: Pattern = Pattern::new("Block", &[(0, 0), (1, 0), (0, 1), (1, 1)]);

/// Toad - period 2 oscillator.
pub const TOAD: Pattern = Pattern::new(
    "Toad",
    &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
);

/// Beacon - period 2 oscillator made of two blocks.
pub const BEACON: Pattern = Pattern::new(
    "Beacon",
    &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
);

/// Pulsar - period 3 oscillator with fourfold symmetry.
#[rustfmt::skip]
pub const PULSAR: Pattern = Pattern::new(
    "Pulsar",
    &[
        (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
        (0, 2), (5, 2), (7, 2), (12, 2),
        (0, 3), (5, 3), (7, 3), (12, 3),
        (0, 4), (5, 4), (7, 4), (12, 4),
        (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
        (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
        (0, 8), (5, 8), (7, 8), (12, 8),
        (0, 9), (5, 9), (7, 9), (12, 9),
        (0, 10), (5, 10), (7, 10), (12, 10),
        (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
    ],
);

/// R-pentomino - methuselah that stabilizes after 1103 generations.
pub const R_PENTOMINO: Pattern = Pattern::new(
    "R-pentomino",
    &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
);

/// Lightweight spaceship - moves two cells horizontally every 4 generations.
pub const LWSS: Pattern = Pattern::new(
    "LWSS",
    &[(1, 0), (4, 0), (0, 1), (0, 2), (4, 2), (0, 3), (1, 3), (2, 3), (3, 3)],
);

/// Gosper glider gun - emits a glider every 30 generations.
#[rustfmt::skip]
pub const GOSPER_GLIDER_GUN: Pattern = Pattern::new(
    "Gosper glider gun",
    &[
        (24, 0),
        (22, 1), (24, 1),
        (12, 2), (13, 2), (20, 2), (21, 2), (34, 2), (35, 2),
        (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3),
        (0, 4), (1, 4), (10, 4), (16, 4), (20, 4), (21, 4),
        (0, 5), (1, 5), (10, 5), (14, 5), (16, 5), (17, 5), (22, 5), (24, 5),
        (10, 6), (16, 6), (24, 6),
        (11, 7), (15, 7),
        (12, 8), (13, 8),
    ],
);

/// Every preset, in display order.
pub const ALL: &[&Pattern] = &[
    &GLIDER,
    &BLINKER,
    &BLOCK,
    &TOAD,
    &BEACON,
    &PULSAR,
    &R_PENTOMINO,
    &LWSS,
    &GOSPER_GLIDER_GUN,
];
