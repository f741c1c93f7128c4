/// ASCII point plotter for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;

/// Marker drawn for each projected vertex
const MARKER: char = 'o';
/// Marker for cells hit by more than one vertex
const STACKED_MARKER: char = '@';

/// Virtual pixels covered by one terminal cell
pub const CELL_WIDTH: u32 = 8;
pub const CELL_HEIGHT: u32 = 16;

/// Terminal grid expressed in the virtual pixel space the core works in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn pixel_width(&self) -> u32 {
        self.cols as u32 * CELL_WIDTH
    }

    pub fn pixel_height(&self) -> u32 {
        self.rows as u32 * CELL_HEIGHT
    }

    /// Center of a cell in pixel coordinates
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> (f64, f64) {
        (
            (col as u32 * CELL_WIDTH + CELL_WIDTH / 2) as f64,
            (row as u32 * CELL_HEIGHT + CELL_HEIGHT / 2) as f64,
        )
    }

    /// Cell containing a pixel position, if it lies inside the grid
    pub fn pixel_to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / CELL_WIDTH as f64) as usize;
        let row = (y / CELL_HEIGHT as f64) as usize;
        if col >= self.cols as usize || row >= self.rows as usize {
            return None;
        }
        Some((col, row))
    }
}

/// Plots projected points into a character grid
pub struct PointRenderer {
    viewport: Viewport,
    char_buffer: Vec<char>,
}

impl PointRenderer {
    pub fn new(viewport: Viewport) -> Self {
        let size = viewport.cols as usize * viewport.rows as usize;
        Self {
            viewport,
            char_buffer: vec![' '; size],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Plot pixel-space points; points outside the grid are dropped.
    /// Returns how many landed on screen.
    pub fn plot_points(&mut self, points: &[(f64, f64)]) -> usize {
        let mut visible = 0;
        for &(x, y) in points {
            if let Some((col, row)) = self.viewport.pixel_to_cell(x, y) {
                let idx = row * self.viewport.cols as usize + col;
                self.char_buffer[idx] = match self.char_buffer[idx] {
                    ' ' => MARKER,
                    _ => STACKED_MARKER,
                };
                visible += 1;
            }
        }
        visible
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.viewport.cols as usize {
            return None;
        }
        self.char_buffer
            .get(row * self.viewport.cols as usize + col)
            .copied()
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let cols = self.viewport.cols as usize;
        for (row, line) in self.char_buffer.chunks(cols.max(1)).enumerate() {
            for &c in line {
                let color = match c {
                    MARKER => Color::Cyan,
                    STACKED_MARKER => Color::White,
                    _ => Color::DarkGrey,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if row + 1 < self.viewport.rows as usize {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
