use crate::error::GridShapeError;
use crate::patterns::Pattern;
use crate::rng::SimpleRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-size boolean cell matrix with toroidal topology.
///
/// Cells are stored row-major. The last row is adjacent to the first and
/// the last column to the first, so there are no edge cells.
///
/// A `Grid` is a plain value: cloning produces an independent copy and no
/// two owners ever share mutable cell storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

/// Unchecked wire form of a [`Grid`]; deserialization re-validates the shape.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Grid::try_from_cells(raw.width, raw.height, raw.cells)
    }
}

impl Grid {
    /// Creates an all-dead grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Creates a grid from row-major cell states.
    ///
    /// Returns `None` if the dimensions are zero or `cells` has the wrong length.
    pub fn from_cells(width: usize, height: usize, cells: Vec<bool>) -> Option<Self> {
        Self::try_from_cells(width, height, cells).ok()
    }

    /// Like [`from_cells`](Self::from_cells), reporting the bad shape.
    pub fn try_from_cells(
        width: usize,
        height: usize,
        cells: Vec<bool>,
    ) -> Result<Self, GridShapeError> {
        let fits = width > 0 && height > 0 && width.checked_mul(height) == Some(cells.len());
        if !fits {
            return Err(GridShapeError {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from text rows, `#`/`O`/`*` meaning alive.
    ///
    /// Short rows are padded with dead cells. Returns `None` for empty input.
    pub fn from_art(art: &str) -> Option<Self> {
        let rows: Vec<&str> = art.lines().map(str::trim_end).collect();
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max()?;
        if width == 0 {
            return None;
        }

        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.set(x, y, matches!(c, '#' | 'O' | '*'));
            }
        }
        Some(grid)
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of cells.
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Gets the state of a cell. Out-of-range coordinates read as dead.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x < self.width && y < self.height {
            self.cells[self.index(x, y)]
        } else {
            false
        }
    }

    /// Sets the state of a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = alive;
        }
    }

    /// Flips a cell and returns its new state.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = !self.cells[i];
            self.cells[i]
        } else {
            false
        }
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Sets every cell to `alive`.
    pub fn fill(&mut self, alive: bool) {
        self.cells.fill(alive);
    }

    /// Randomizes cells with given density (0.0 to 1.0).
    pub fn randomize(&mut self, seed: u64, density: f32) {
        let mut rng = SimpleRng::new(seed);
        for cell in &mut self.cells {
            *cell = rng.next_f32() < density;
        }
    }

    /// Writes a pattern's live cells with its origin at `(x, y)`.
    ///
    /// Offsets wrap around the torus; dead cells under the pattern are left
    /// untouched.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) {
        for &(dx, dy) in pattern.cells() {
            let px = (x + dx) % self.width;
            let py = (y + dy) % self.height;
            self.set(px, py, true);
        }
    }

    /// Stamps a pattern centred on the grid.
    pub fn stamp_centered(&mut self, pattern: &Pattern) {
        let (pw, ph) = pattern.dimensions();
        let x = self.width.saturating_sub(pw) / 2;
        let y = self.height.saturating_sub(ph) / 2;
        self.stamp(pattern, x, y);
    }

    /// Counts live cells in the Moore neighbourhood of `(x, y)`.
    ///
    /// Neighbours are sampled at `((x + dx + W) mod W, (y + dy + H) mod H)`.
    /// `x` and `y` must already be in range.
    pub fn neighbor_count(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);

        let w = self.width;
        let h = self.height;
        let left = (x + w - 1) % w;
        let right = (x + 1) % w;
        let up = (y + h - 1) % h;
        let down = (y + 1) % h;

        let mut count = 0u8;
        for (j, ny) in [up, y, down].into_iter().enumerate() {
            let row = ny * w;
            for (i, nx) in [left, x, right].into_iter().enumerate() {
                // Skip the centre offset, not the centre coordinate: on a
                // one-cell-wide torus the cell is its own neighbour.
                if (i, j) != (1, 1) && self.cells[row + nx] {
                    count += 1;
                }
            }
        }

        count
    }

    /// Counts total alive cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Fraction of live cells, in `[0, 1]`.
    pub fn density(&self) -> f64 {
        self.population() as f64 / self.area() as f64
    }

    /// Returns the row-major cell states.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterates over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    /// Returns a single row.
    pub fn row(&self, y: usize) -> &[bool] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Renders the grid as text, one line per row.
    pub fn to_string_art(&self) -> String {
        let mut result = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            for &cell in row {
                result.push(if cell { '█' } else { '·' });
            }
            result.push('\n');
        }
        result
    }
}
