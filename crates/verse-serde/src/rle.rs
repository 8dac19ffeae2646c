//! Run-length encoding of grids.
//!
//! Cell bodies use the Life RLE alphabet: `b` is a dead cell, `o` a live
//! one, `$` ends a row and `!` ends the pattern. A number before a tag
//! repeats it. Dead cells at the end of a row and empty rows at the end of
//! the grid are implied, so an all-dead grid encodes as `!`.

use std::fmt::Write as _;

use crate::error::CodecError;
use crate::format::UniverseFormat;
use crate::serial::{DecodedUniverse, SerialUniverse};
use rhizome_verse_automata::{Grid, RuleSet};

/// Largest grid the decoder will allocate.
pub const MAX_CELLS: usize = 1 << 24;

/// Column at which [`RleFormat`] wraps cell data.
const LINE_WIDTH: usize = 70;

/// Encodes a grid's cells as an RLE body.
pub fn encode_cells(grid: &Grid) -> String {
    let mut out = String::new();
    let mut pending_rows = 0usize;

    for (y, row) in grid.rows().enumerate() {
        if row.iter().any(|&c| c) {
            push_run(&mut out, pending_rows, '$');
            pending_rows = 0;

            let live_end = row.iter().rposition(|&c| c).map_or(0, |i| i + 1);
            let mut x = 0;
            while x < live_end {
                let alive = row[x];
                let len = row[x..live_end].iter().take_while(|&&c| c == alive).count();
                push_run(&mut out, len, if alive { 'o' } else { 'b' });
                x += len;
            }
        }
        if y + 1 < grid.height() {
            pending_rows += 1;
        }
    }

    out.push('!');
    out
}

fn push_run(out: &mut String, len: usize, tag: char) {
    match len {
        0 => {}
        1 => out.push(tag),
        n => {
            let _ = write!(out, "{}{}", n, tag);
        }
    }
}

/// Decodes an RLE body into a `width` x `height` grid.
///
/// Whitespace is ignored and the `!` terminator is optional. Runs that
/// leave the grid are rejected rather than clipped.
pub fn decode_cells(width: usize, height: usize, body: &str) -> Result<Grid, CodecError> {
    check_dimensions(width, height)?;
    let mut grid = Grid::new(width, height);
    let (mut x, mut y) = (0usize, 0usize);
    let mut count: Option<usize> = None;

    for c in body.chars() {
        match c {
            '0'..='9' => {
                let digit = c as usize - '0' as usize;
                let next = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or(CodecError::CountOverflow)?;
                count = Some(next);
            }
            'b' | '.' | 'o' | 'A' => {
                let run = count.take().unwrap_or(1);
                let end = x
                    .checked_add(run)
                    .filter(|&end| end <= width && y < height)
                    .ok_or(CodecError::RunOutOfBounds { x, y })?;
                if matches!(c, 'o' | 'A') {
                    for cx in x..end {
                        grid.set(cx, y, true);
                    }
                }
                x = end;
            }
            '$' => {
                let rows = count.take().unwrap_or(1);
                y = y.checked_add(rows).ok_or(CodecError::CountOverflow)?;
                if y > height {
                    return Err(CodecError::RunOutOfBounds { x: 0, y });
                }
                x = 0;
            }
            '!' => {
                if count.is_some() {
                    return Err(CodecError::DanglingCount);
                }
                return Ok(grid);
            }
            c if c.is_whitespace() => {}
            c => return Err(CodecError::UnexpectedChar(c)),
        }
    }

    if count.is_some() {
        return Err(CodecError::DanglingCount);
    }
    Ok(grid)
}

fn check_dimensions(width: usize, height: usize) -> Result<(), CodecError> {
    match width.checked_mul(height) {
        Some(area) if area > 0 && area <= MAX_CELLS => Ok(()),
        _ => Err(CodecError::InvalidDimensions { width, height }),
    }
}

/// Golly-compatible RLE text format.
///
/// ```text
/// #N glider field
/// #G 42
/// x = 16, y = 16, rule = B3/S23
/// bo$2bo$3o!
/// ```
///
/// `#N` carries the name and `#G` the generation; other `#` lines are
/// ignored on input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleFormat;

impl RleFormat {
    /// Creates a new RleFormat.
    pub fn new() -> Self {
        Self
    }

    /// Writes a universe as RLE text.
    pub fn to_text(&self, universe: &SerialUniverse) -> String {
        let mut out = String::new();
        let name = universe.name.replace(['\r', '\n'], " ");
        if !name.trim().is_empty() {
            let _ = writeln!(out, "#N {}", name.trim());
        }
        let _ = writeln!(out, "#G {}", universe.generation);
        let _ = writeln!(
            out,
            "x = {}, y = {}, rule = {}",
            universe.width, universe.height, universe.rule
        );
        for chunk in universe.cells.as_bytes().chunks(LINE_WIDTH) {
            // The body is pure ASCII, so byte chunks are valid UTF-8.
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
        out
    }

    /// Parses RLE text.
    pub fn from_text(&self, text: &str) -> Result<SerialUniverse, CodecError> {
        let mut name = String::new();
        let mut generation = 0u64;
        let mut header = None;
        let mut body = String::new();

        for line in text.lines() {
            let line = line.trim();
            if header.is_none() {
                if let Some(rest) = line.strip_prefix("#N") {
                    name = rest.trim().to_string();
                } else if let Some(rest) = line.strip_prefix("#G") {
                    generation = rest.trim().parse().map_err(|_| {
                        CodecError::InvalidHeader(format!("bad generation '{}'", rest.trim()))
                    })?;
                } else if line.starts_with('#') || line.is_empty() {
                    continue;
                } else {
                    header = Some(parse_header(line)?);
                }
            } else {
                body.push_str(line);
            }
        }

        let (width, height, rule) = header.ok_or(CodecError::MissingHeader)?;
        Ok(SerialUniverse {
            name,
            width,
            height,
            rule,
            generation,
            cells: body,
        })
    }

    /// Parses RLE text straight into live values.
    pub fn decode(&self, text: &str) -> Result<DecodedUniverse, CodecError> {
        self.from_text(text)?.into_decoded()
    }
}

/// Parses `x = W, y = H[, rule = R]`.
fn parse_header(line: &str) -> Result<(usize, usize, String), CodecError> {
    let mut width = None;
    let mut height = None;
    let mut rule = RuleSet::life().to_string();

    for field in line.split(',') {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| CodecError::InvalidHeader(line.to_string()))?;
        let value = value.trim();
        match key.trim() {
            "x" => width = value.parse().ok(),
            "y" => height = value.parse().ok(),
            "rule" => rule = value.to_string(),
            _ => {}
        }
    }

    match (width, height) {
        (Some(w), Some(h)) => {
            check_dimensions(w, h)?;
            Ok((w, h, rule))
        }
        _ => Err(CodecError::InvalidHeader(line.to_string())),
    }
}

impl UniverseFormat for RleFormat {
    fn serialize(&self, universe: &SerialUniverse) -> Result<Vec<u8>, CodecError> {
        Ok(self.to_text(universe).into_bytes())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<SerialUniverse, CodecError> {
        self.from_text(std::str::from_utf8(bytes)?)
    }

    fn name(&self) -> &'static str {
        "rle"
    }

    fn extension(&self) -> &'static str {
        "rle"
    }
}
