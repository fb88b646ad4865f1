#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use clock::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use timer::TimerKind;
pub use types::*;

mod clock;
mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod timer;
mod types;

/// Number of stepping stones after the start cell.
pub const TOTAL_NUMBERS: Label = 50;

/// Column count used on every device.
pub const DEFAULT_COLS: Coord = 6;

/// Enough rows to leave roughly a fifth of the grid empty.
pub const DEFAULT_ROWS: Coord =
    (TOTAL_NUMBERS as usize * 6 / 5).div_ceil(DEFAULT_COLS as usize) as Coord;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub topology: GridTopology,
    /// Label of the goal cell, the path holds `path_len + 1` cells.
    pub path_len: Label,
}

impl GameConfig {
    pub const DEFAULT: Self = Self::new_unchecked(
        GridTopology::new_unchecked(DEFAULT_ROWS, DEFAULT_COLS),
        TOTAL_NUMBERS,
    );

    pub const fn new_unchecked(topology: GridTopology, path_len: Label) -> Self {
        Self { topology, path_len }
    }

    /// Clamps the grid to at least two cells and the path to what the grid can hold.
    pub fn new((rows, cols): (Coord, Coord), path_len: Label) -> Self {
        let topology = GridTopology::new_unchecked(rows, cols).playable();
        let path_len = path_len.clamp(1, topology.total_cells() - 1);
        Self::new_unchecked(topology, path_len)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Durations driving the session timers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// How long the whole board stays visible before play starts.
    pub dwell: Millis,
    /// Inactivity before nearby labels are peeked.
    pub idle: Millis,
    /// How long a peek stays visible.
    pub reveal: Millis,
    /// Refresh period of the displayed clock.
    pub clock_period: Millis,
    /// Length of the shake pulse after a correct step.
    pub shake: Millis,
    /// Vibration length for hosts that support it.
    pub haptic: Millis,
    /// Chebyshev radius of the peek around the player.
    pub hint_radius: Coord,
}

impl Timings {
    pub const DEFAULT: Self = Self {
        dwell: 2000,
        idle: 1000,
        reveal: 1000,
        clock_period: 100,
        shake: 400,
        haptic: 30,
        hint_radius: 2,
    };
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Generated grid-to-label assignment, read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    topology: GridTopology,
    labels: Array2<Option<Label>>,
    path: Vec<Cell>,
    fallback: bool,
}

impl Board {
    /// Builds a board where `path[i]` holds label `i`.
    pub fn from_path(topology: GridTopology, path: &[Cell]) -> Result<Self> {
        if path.is_empty() {
            return Err(GameError::EmptyPath);
        }

        let mut seen: Array2<bool> = Array2::default(topology.dim());
        for (i, &cell) in path.iter().enumerate() {
            if !topology.contains(cell) {
                return Err(GameError::InvalidCoords);
            }
            if seen[cell.to_nd_index()] {
                return Err(GameError::DuplicateCell);
            }
            seen[cell.to_nd_index()] = true;
            if i > 0 && !path[i - 1].is_adjacent(cell) {
                return Err(GameError::NotAdjacent);
            }
        }

        Ok(Self::from_path_unchecked(topology, path.to_vec(), false))
    }

    pub(crate) fn from_path_unchecked(
        topology: GridTopology,
        path: Vec<Cell>,
        fallback: bool,
    ) -> Self {
        let mut labels: Array2<Option<Label>> = Array2::default(topology.dim());
        for (label, &cell) in path.iter().enumerate() {
            labels[cell.to_nd_index()] = Some(label as Label);
        }
        Self {
            topology,
            labels,
            path,
            fallback,
        }
    }

    pub fn topology(&self) -> GridTopology {
        self.topology
    }

    /// Label of the final cell.
    pub fn goal(&self) -> Label {
        (self.path.len() - 1) as Label
    }

    pub fn start(&self) -> Cell {
        self.path[0]
    }

    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Whether the patterned fallback was used instead of a random walk.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Label at `cell`, `None` for empty or out of bounds cells.
    pub fn label_at(&self, cell: Cell) -> Option<Label> {
        self.labels
            .get(cell.to_nd_index())
            .copied()
            .flatten()
    }

    pub fn cell_of(&self, label: Label) -> Option<Cell> {
        self.path.get(usize::from(label)).copied()
    }

    /// Labels whose cells lie within Chebyshev distance `radius` of `center`.
    pub fn labels_near(&self, center: Cell, radius: Coord) -> impl Iterator<Item = Label> + '_ {
        self.topology
            .neighborhood(center, radius)
            .filter_map(|cell| self.label_at(cell))
    }
}

impl Index<Cell> for Board {
    type Output = Option<Label>;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.labels[cell.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not playing, off the grid, or onto an empty cell.
    NoChange,
    Advanced,
    Completed,
    Failed,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Advanced => true,
            Completed => true,
            Failed => true,
        }
    }
}

/// Formats a duration as `m:ss.cc`.
pub fn format_time(ms: Millis) -> String {
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let centis = (ms % 1000) / 10;
    alloc::format!("{minutes}:{seconds:02}.{centis:02}")
}
