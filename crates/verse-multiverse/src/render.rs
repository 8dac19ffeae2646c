//! Rendering boundary.
//!
//! A [`Renderer`] turns a grid into whatever a front end draws.
//! [`AsciiRenderer`] targets terminals and logs, [`PixelRenderer`] fills
//! plain RGBA frame buffers, and with the `image` feature `ImageRenderer`
//! produces an `image::RgbaImage` ready to encode.

use rhizome_verse_automata::Grid;

/// Draws a grid at a given cell size.
pub trait Renderer {
    /// Rendered frame type.
    type Output;

    /// Renders `grid`, each cell occupying `cell_size` units square.
    /// A cell size of 0 is treated as 1.
    fn render(&mut self, grid: &Grid, cell_size: u32) -> Self::Output;
}

/// Renders grids as text, one character per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiRenderer {
    /// Character for live cells.
    pub alive: char,
    /// Character for dead cells.
    pub dead: char,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self {
            alive: '#',
            dead: '.',
        }
    }
}

impl Renderer for AsciiRenderer {
    type Output = String;

    fn render(&mut self, grid: &Grid, cell_size: u32) -> String {
        let size = cell_size.max(1) as usize;
        let mut out = String::with_capacity((grid.width() * size + 1) * grid.height() * size);
        for row in grid.rows() {
            let mut line = String::with_capacity(row.len() * size);
            for &alive in row {
                let c = if alive { self.alive } else { self.dead };
                line.extend(std::iter::repeat_n(c, size));
            }
            for _ in 0..size {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }
}

/// RGBA8 frame, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Returns the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    /// Converts into an [`image::RgbaImage`].
    #[cfg(feature = "image")]
    pub fn into_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data)
    }
}

/// Renders grids into RGBA pixel buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRenderer {
    /// Color of live cells.
    pub alive: [u8; 4],
    /// Color of dead cells.
    pub dead: [u8; 4],
}

impl Default for PixelRenderer {
    fn default() -> Self {
        Self {
            alive: [0x39, 0xff, 0x14, 0xff],
            dead: [0x0a, 0x0a, 0x12, 0xff],
        }
    }
}

impl Renderer for PixelRenderer {
    type Output = PixelBuffer;

    fn render(&mut self, grid: &Grid, cell_size: u32) -> PixelBuffer {
        let size = cell_size.max(1) as usize;
        let width = grid.width() * size;
        let height = grid.height() * size;
        let mut data = Vec::with_capacity(width * height * 4);
        for row in grid.rows() {
            let start = data.len();
            for &alive in row {
                let color = if alive { self.alive } else { self.dead };
                for _ in 0..size {
                    data.extend_from_slice(&color);
                }
            }
            let end = data.len();
            for _ in 1..size {
                data.extend_from_within(start..end);
            }
        }
        PixelBuffer {
            width: width as u32,
            height: height as u32,
            data,
        }
    }
}

/// Renders grids into [`image::RgbaImage`]s.
#[cfg(feature = "image")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageRenderer {
    /// Colors used for live and dead cells.
    pub palette: PixelRenderer,
}

#[cfg(feature = "image")]
impl Renderer for ImageRenderer {
    type Output = image::RgbaImage;

    fn render(&mut self, grid: &Grid, cell_size: u32) -> image::RgbaImage {
        let size = cell_size.max(1);
        let width = grid.width() as u32 * size;
        let height = grid.height() as u32 * size;
        image::RgbaImage::from_fn(width, height, |x, y| {
            let alive = grid.get((x / size) as usize, (y / size) as usize);
            image::Rgba(if alive { self.palette.alive } else { self.palette.dead })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhizome_verse_automata::patterns;

    fn blinker() -> Grid {
        let mut grid = Grid::new(5, 5);
        grid.stamp(&patterns::BLINKER, 1, 2);
        grid
    }

    #[test]
    fn test_ascii_single_cell() {
        let text = AsciiRenderer::default().render(&blinker(), 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], ".###.");
        assert_eq!(lines[0], ".....");
    }

    #[test]
    fn test_ascii_scaled() {
        let mut grid = Grid::new(2, 1);
        grid.set(0, 0, true);
        let text = AsciiRenderer::default().render(&grid, 2);
        assert_eq!(text, "##..\n##..\n");
        assert_eq!(AsciiRenderer::default().render(&grid, 0), "#.\n");
    }

    #[test]
    fn test_pixel_buffer_layout() {
        let mut renderer = PixelRenderer::default();
        let buffer = renderer.render(&blinker(), 3);
        assert_eq!((buffer.width, buffer.height), (15, 15));
        assert_eq!(buffer.data.len(), 15 * 15 * 4);

        // Cell (1, 2) covers pixels 3..6 x 6..9.
        assert_eq!(buffer.pixel(3, 6), Some(renderer.alive));
        assert_eq!(buffer.pixel(5, 8), Some(renderer.alive));
        assert_eq!(buffer.pixel(2, 6), Some(renderer.dead));
        assert_eq!(buffer.pixel(3, 9), Some(renderer.dead));
        assert_eq!(buffer.pixel(15, 0), None);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_into_image() {
        let buffer = PixelRenderer::default().render(&blinker(), 2);
        let image = buffer.into_image().unwrap();
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(2, 4).0, PixelRenderer::default().alive);
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_image_renderer_matches_pixels() {
        let grid = blinker();
        let image = ImageRenderer::default().render(&grid, 3);
        let buffer = PixelRenderer::default().render(&grid, 3);
        assert_eq!(image.into_raw(), buffer.data);
    }
}
