use glam::UVec2;

use crate::components::{Direction, LevelConfig, DEFAULT_GOAL, DEFAULT_SIZE, DEFAULT_START, MIN_DIFFICULTY_FACTOR};
use crate::grid::{Archetype, Board, Tile, TileId};

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        // Avoid zero state
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Generate next u64 using xorshift64.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }
}

/// Base draw weights in catalog order: straights and corners common, tee rare, cross rarest.
pub const BASE_WEIGHTS: [u32; 8] = [18, 18, 12, 12, 12, 12, 6, 2];

/// Weights after dividing by the difficulty factor, floored, never below 1.
pub fn archetype_weights(difficulty_factor: f64) -> [u32; 8] {
    let factor = difficulty_factor.max(MIN_DIFFICULTY_FACTOR);
    BASE_WEIGHTS.map(|w| ((w as f64 / factor).floor() as u32).max(1))
}

/// Weighted draw of an archetype index.
///
/// Draws `v` uniformly in `[0, sum)` and walks the table, returning the first
/// index whose weight exceeds what is left of `v`.
pub fn weighted_archetype_pick(rng: &mut Rng, difficulty_factor: f64) -> usize {
    let weights = archetype_weights(difficulty_factor);
    let sum: u32 = weights.iter().sum();
    let mut v = rng.next_int(sum);
    for (i, &w) in weights.iter().enumerate() {
        if v < w {
            return i;
        }
        v -= w;
    }
    0
}

/// Builds level boards. Owns the random source and mints tile identities.
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    pub rng: Rng,
    next_id: u32,
}

impl BoardGenerator {
    pub fn new(seed: u64) -> Self {
        BoardGenerator {
            rng: Rng::new(seed),
            next_id: 0,
        }
    }

    fn mint(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A random catalog tile at a random rotation.
    pub fn random_tile(&mut self, difficulty_factor: f64) -> Tile {
        let archetype = Archetype::CATALOG[weighted_archetype_pick(&mut self.rng, difficulty_factor)];
        let rotation = self.rng.next_int(4);
        let id = self.mint();
        Tile::from_archetype(archetype, rotation, id)
    }

    /// Populate a `size`×`size` board, open the start (right) and goal (left)
    /// connectors, then apply `scramble_count` random pairwise swaps.
    ///
    /// Solvability is not checked after scrambling. Since swaps can carry the
    /// forced tiles away, the start/goal connectors are forced once more on
    /// whatever tiles end up in those cells. The browser game skipped this
    /// second pass; it is kept so that start always opens right and goal
    /// always opens left on every generated board.
    pub fn generate(
        &mut self,
        size: usize,
        difficulty_factor: f64,
        scramble_count: usize,
        start: UVec2,
        goal: UVec2,
    ) -> Board {
        assert!(size > 0, "board size must be positive");
        let tiles = (0..size * size).map(|_| self.random_tile(difficulty_factor)).collect();
        let mut board = Board::new(size, tiles, 0, 0);
        board.start = board.index_of(start);
        board.goal = board.index_of(goal);

        self.force_endpoints(&mut board);

        let cells = board.len() as u32;
        for _ in 0..scramble_count {
            let a = self.rng.next_int(cells) as usize;
            let b = self.rng.next_int(cells) as usize;
            board.swap(a, b);
        }

        self.force_endpoints(&mut board);

        log::debug!(
            "generated {}x{} board (factor {}, {} swaps, start {}, goal {})",
            size,
            size,
            difficulty_factor,
            scramble_count,
            board.start,
            board.goal
        );
        board
    }

    /// Default-shaped board for a level.
    pub fn generate_level(&mut self, level: &LevelConfig) -> Board {
        self.generate(DEFAULT_SIZE, level.weights_factor, level.swaps, DEFAULT_START, DEFAULT_GOAL)
    }

    fn force_endpoints(&mut self, board: &mut Board) {
        for (cell, dir) in [(board.start, Direction::Right), (board.goal, Direction::Left)] {
            let tile = *board.tile(cell);
            *board.tile_mut(cell) = tile.ensure_connector(dir, || self.mint());
        }
    }
}
