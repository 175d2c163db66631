use glam::{IVec2, UVec2};

/// One of the four sides of a tile.
/// Discriminants double as connector bit positions: up=0, right=1, down=2, left=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Visiting order used by the path search.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn from_index(i: usize) -> Direction {
        Self::ALL[i % 4]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Connector bit for this side in a tile mask.
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The side facing back (for checking mutual connections).
    pub fn opposite(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    /// Grid step as (column, row) delta. Rows grow downwards.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }
}

/// Game phase as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GamePhase {
    Playing = 0,
    Won = 1,
}

/// Sound events that the simulation emits for the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SoundEvent {
    Pick = 0,     // drag started
    Drop = 1,     // drag released (swap or cancel)
    Ping = 2,     // path active / hint
    WinChime = 3,
}

/// Per-level tuning. Supplied to the generator as plain values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub id: u32,
    /// Random pairwise swaps applied after generation.
    pub swaps: usize,
    /// Divides the archetype weights; higher favours junction tiles.
    pub weights_factor: f64,
}

pub const LEVELS: [LevelConfig; 2] = [
    LevelConfig { id: 1, swaps: 150, weights_factor: 1.0 },
    LevelConfig { id: 2, swaps: 320, weights_factor: 1.6 },
];

/// Board side length.
pub const DEFAULT_SIZE: usize = 5;
/// Start and goal cells as (column, row).
pub const DEFAULT_START: UVec2 = UVec2::new(0, 2);
pub const DEFAULT_GOAL: UVec2 = UVec2::new(DEFAULT_SIZE as u32 - 1, 2);

pub const MIN_DIFFICULTY_FACTOR: f64 = 0.1;
