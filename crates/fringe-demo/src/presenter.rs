#![forbid(unsafe_code)]

//! Half-block terminal presenter.
//!
//! Each terminal cell shows two vertically stacked samples of the surface:
//! the upper half as the foreground of `▀`, the lower half as the
//! background. Sampling is nearest-neighbor at the center of each
//! half-cell. Translucent pixels are composited over black first.
//!
//! The bottom terminal row is reserved for a status line.

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use fringe_render::{PackedRgba, Present, Surface};
use std::io::{self, Write};

const UPPER_HALF_BLOCK: char = '▀';

/// Presents surfaces as truecolor half-block cells.
#[derive(Debug)]
pub struct TerminalPresenter<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    status: String,
}

impl<W: Write> TerminalPresenter<W> {
    /// Presenter drawing `cols` x `rows` cells of picture into `out`, with
    /// the status line on row `rows`.
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            status: String::new(),
        }
    }

    /// Adopt a new picture size.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Text drawn below the picture on the next present.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Underlying writer.
    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Present for TerminalPresenter<W> {
    fn present(&mut self, frame: &Surface) -> io::Result<()> {
        if self.cols > 0 && self.rows > 0 && !frame.is_empty() {
            let cells = downsample(frame, self.cols, self.rows);
            let mut last = None;
            for (row, line) in cells.chunks(usize::from(self.cols)).enumerate() {
                queue!(self.out, MoveTo(0, row as u16))?;
                for &[top, bottom] in line {
                    if last != Some((top, bottom)) {
                        queue!(
                            self.out,
                            SetForegroundColor(term_color(top)),
                            SetBackgroundColor(term_color(bottom))
                        )?;
                        last = Some((top, bottom));
                    }
                    queue!(self.out, Print(UPPER_HALF_BLOCK))?;
                }
            }
        }
        queue!(
            self.out,
            ResetColor,
            MoveTo(0, self.rows),
            Clear(ClearType::CurrentLine),
            Print(&self.status)
        )?;
        self.out.flush()
    }
}

/// Sample `surface` into `cols * rows` cells, row-major, each holding
/// `[upper, lower]` opaque colors.
pub fn downsample(surface: &Surface, cols: u16, rows: u16) -> Vec<[PackedRgba; 2]> {
    let mut cells = Vec::with_capacity(usize::from(cols) * usize::from(rows));
    if cols == 0 || rows == 0 {
        return cells;
    }
    let width = u32::from(surface.width());
    let height = u32::from(surface.height());
    let sub_rows = 2 * u32::from(rows);
    let sample = |x: u32, sub_row: u32| {
        let px = ((2 * x + 1) * width / (2 * u32::from(cols))) as u16;
        let py = ((2 * sub_row + 1) * height / (2 * sub_rows)) as u16;
        surface
            .get(px, py)
            .unwrap_or(PackedRgba::TRANSPARENT)
            .over(PackedRgba::BLACK)
    };
    for row in 0..u32::from(rows) {
        for col in 0..u32::from(cols) {
            cells.push([sample(col, 2 * row), sample(col, 2 * row + 1)]);
        }
    }
    cells
}

fn term_color(color: PackedRgba) -> Color {
    Color::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}
