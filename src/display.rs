use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

const PIXEL_COUNT: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// The 64x32 monochrome screen owned by the interpreter. One byte per pixel,
/// 0 or 1, row-major. Whoever renders it acknowledges with `clear_redraw`.
pub struct Framebuffer {
    cells: Box<[u8]>,
    redraw: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            cells: vec![0u8; PIXEL_COUNT].into_boxed_slice(),
            redraw: false,
        }
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// pixel at (x, y); coordinates wrap
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[(x + y * DISPLAY_WIDTH) % PIXEL_COUNT]
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0);
        self.redraw = true;
    }

    /// XOR one 8 pixel sprite row onto the screen, MSB leftmost. Pixels are
    /// addressed as x + y * 64 modulo the screen size, so a row running off the
    /// right edge carries on at the start of the next line. Returns true if
    /// any lit pixel was switched off.
    pub fn draw_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        for col in 0..8 {
            if row & (0x80 >> col) != 0 {
                let idx = (x + col + y * DISPLAY_WIDTH) % PIXEL_COUNT;
                if self.cells[idx] == 1 {
                    collision = true;
                }
                self.cells[idx] ^= 1;
            }
        }
        self.redraw = true;
        collision
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    pub fn set_redraw(&mut self) {
        self.redraw = true;
    }

    pub fn clear_redraw(&mut self) {
        self.redraw = false;
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Display is used to put the framebuffer on some kind of screen. The
/// interpreter doesn't know or care how that happens.
pub trait Display {
    /// render the whole framebuffer
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coords of every cell holding `value`
    fn points<'a>(
        &self,
        cells: &'a [u8],
        value: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                if cells[count] == value {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            frame.cells().len(),
            self.resolution.pixel_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        let lit: Vec<_> = self.resolution.points(frame.cells(), 1).collect();
        let unlit: Vec<_> = self.resolution.points(frame.cells(), 0).collect();
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();
        let size = Rect::new(
            0,
            0,
            2 + self.resolution.0 as u16,
            2 + self.resolution.1 as u16,
        );

        // 1:1 between terminal cells, chip-8 pixels and the canvas
        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; remembers what it was given
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last: Vec<u8>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames += 1;
        self.last = frame.cells().to_vec();
        Ok(())
    }
}
