#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for maze snapshots.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result as AnyResult};
use maze_lab_core::{CellCoord, CellSnapshot, Direction, GridSnapshot, Terrain};

/// ANSI sequence that clears the terminal and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Adapter capable of displaying published grid snapshots.
pub trait Presenter {
    /// Displays `snapshot`, optionally accompanied by a status line.
    fn present(&mut self, snapshot: &GridSnapshot, status: Option<&str>) -> AnyResult<()>;
}

/// Character used for the interior of a cell.
///
/// Terminals take precedence over the path, the path over visited marks, and
/// visited marks over terrain.
#[must_use]
pub fn cell_glyph(snapshot: &GridSnapshot, coord: CellCoord, cell: &CellSnapshot) -> char {
    if coord == snapshot.start() {
        'S'
    } else if coord == snapshot.goal() {
        'G'
    } else if cell.on_path {
        '*'
    } else if cell.visited {
        '.'
    } else {
        match cell.terrain {
            Terrain::Low => ' ',
            Terrain::Medium => '~',
            Terrain::High => '#',
        }
    }
}

/// Draws the snapshot as a wall diagram with three-character cells.
#[must_use]
pub fn render_ascii(snapshot: &GridSnapshot) -> String {
    let size = snapshot.size();
    let mut out = String::new();

    for row in 0..size.rows() {
        border_line(&mut out, snapshot, row, Direction::North);
        out.push('|');
        for column in 0..size.columns() {
            let coord = CellCoord::new(column, row);
            let Some(cell) = snapshot.cell(coord) else {
                continue;
            };
            let _ = write!(out, " {} ", cell_glyph(snapshot, coord, cell));
            out.push(if cell.walls.is_open(Direction::East) {
                ' '
            } else {
                '|'
            });
        }
        out.push('\n');
    }
    if size.rows() > 0 {
        border_line(&mut out, snapshot, size.rows() - 1, Direction::South);
    }

    out
}

fn border_line(out: &mut String, snapshot: &GridSnapshot, row: u32, side: Direction) {
    for column in 0..snapshot.size().columns() {
        let open = snapshot
            .cell(CellCoord::new(column, row))
            .is_some_and(|cell| cell.walls.is_open(side));
        out.push('+');
        out.push_str(if open { "   " } else { "---" });
    }
    out.push_str("+\n");
}

/// Presenter writing ASCII frames to any byte sink.
#[derive(Debug)]
pub struct AsciiPresenter<W> {
    out: W,
    clear_between_frames: bool,
    frames: usize,
}

impl<W: Write> AsciiPresenter<W> {
    /// Creates a presenter that appends frames one after another.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_between_frames: false,
            frames: 0,
        }
    }

    /// Creates a presenter that redraws every frame in place on a terminal.
    #[must_use]
    pub fn animated(out: W) -> Self {
        Self {
            out,
            clear_between_frames: true,
            frames: 0,
        }
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Consumes the presenter and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for AsciiPresenter<W> {
    fn present(&mut self, snapshot: &GridSnapshot, status: Option<&str>) -> AnyResult<()> {
        let mut frame = String::new();
        if self.clear_between_frames {
            frame.push_str(CLEAR_SCREEN);
        }
        frame.push_str(&render_ascii(snapshot));
        if let Some(status) = status {
            frame.push_str(status);
            frame.push('\n');
        }

        self.out
            .write_all(frame.as_bytes())
            .context("failed to write maze frame")?;
        self.out.flush().context("failed to flush maze frame")?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_lab_core::GridSize;
    use maze_lab_world::Maze;

    #[test]
    fn closed_grid_draws_every_wall() {
        let maze = Maze::new(GridSize::new(2, 1)).expect("valid size");

        assert_eq!(
            render_ascii(&maze.snapshot()),
            "+---+---+\n| S | G |\n+---+---+\n"
        );
    }

    #[test]
    fn open_passages_remove_wall_segments() {
        let mut maze = Maze::new(GridSize::new(2, 2)).expect("valid size");
        let top_right = CellCoord::new(1, 0);
        maze.open_passage(maze.start(), top_right).expect("adjacent");
        maze.open_passage(top_right, maze.goal()).expect("adjacent");

        assert_eq!(
            render_ascii(&maze.snapshot()),
            concat!(
                "+---+---+\n",
                "| S     |\n",
                "+---+   +\n",
                "|   | G |\n",
                "+---+---+\n",
            )
        );
    }

    #[test]
    fn glyphs_follow_cell_state() {
        let mut maze = Maze::new(GridSize::new(5, 1)).expect("valid size");
        maze.set_terrain(CellCoord::new(1, 0), Terrain::Medium)
            .expect("in bounds");
        maze.set_terrain(CellCoord::new(2, 0), Terrain::High)
            .expect("in bounds");
        maze.mark_visited(CellCoord::new(3, 0));
        maze.mark_on_path(CellCoord::new(1, 0));
        let snapshot = maze.snapshot();

        let glyphs: String = (0..5)
            .map(|column| {
                let coord = CellCoord::new(column, 0);
                let cell = snapshot.cell(coord).expect("in bounds");
                cell_glyph(&snapshot, coord, cell)
            })
            .collect();

        assert_eq!(glyphs, "S*#.G");
    }

    #[test]
    fn presenter_appends_status_line() {
        let maze = Maze::new(GridSize::new(1, 1)).expect("valid size");
        let mut presenter = AsciiPresenter::new(Vec::new());

        presenter
            .present(&maze.snapshot(), Some("Grid Reset."))
            .expect("writing to memory succeeds");

        assert_eq!(presenter.frames(), 1);
        let written = String::from_utf8(presenter.into_inner()).expect("utf-8 output");
        assert_eq!(written, "+---+\n| S |\n+---+\nGrid Reset.\n");
    }

    #[test]
    fn animated_presenter_clears_before_each_frame() {
        let maze = Maze::new(GridSize::new(1, 1)).expect("valid size");
        let mut presenter = AsciiPresenter::animated(Vec::new());

        for _ in 0..2 {
            presenter
                .present(&maze.snapshot(), None)
                .expect("writing to memory succeeds");
        }

        let written = String::from_utf8(presenter.into_inner()).expect("utf-8 output");
        assert_eq!(written.matches(CLEAR_SCREEN).count(), 2);
    }
}
