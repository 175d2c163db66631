use glam::UVec2;

use crate::components::Direction;

/// Canonical connector patterns. Every generated tile is one of these, rotated 0-3 times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Archetype {
    Horizontal = 0,
    Vertical = 1,
    CornerUpRight = 2,
    CornerUpLeft = 3,
    CornerDownLeft = 4,
    CornerDownRight = 5,
    Tee = 6,
    Cross = 7,
}

impl Archetype {
    /// Catalog order; indices line up with the generator's weight table.
    pub const CATALOG: [Archetype; 8] = [
        Archetype::Horizontal,
        Archetype::Vertical,
        Archetype::CornerUpRight,
        Archetype::CornerUpLeft,
        Archetype::CornerDownLeft,
        Archetype::CornerDownRight,
        Archetype::Tee,
        Archetype::Cross,
    ];

    /// Connector mask, bit d = open toward `Direction` d.
    pub fn mask(self) -> u8 {
        match self {
            Archetype::Horizontal => 0b1010,      // right + left
            Archetype::Vertical => 0b0101,        // up + down
            Archetype::CornerUpRight => 0b0011,
            Archetype::CornerUpLeft => 0b1001,
            Archetype::CornerDownLeft => 0b1100,
            Archetype::CornerDownRight => 0b0110,
            Archetype::Tee => 0b0111,             // up + right + down
            Archetype::Cross => 0b1111,
        }
    }
}

/// Tracks which physical tile sits in which cell across swaps. Never used by path logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Rotate a connector mask one step clockwise: side i takes the value previously at (i+3) mod 4.
#[inline]
pub fn rotate_mask(mask: u8, steps: u32) -> u8 {
    let mut m = mask & 0x0F;
    for _ in 0..steps % 4 {
        m = ((m << 1) | (m >> 3)) & 0x0F;
    }
    m
}

/// A single tile. Stores its connectors in the lower 4 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    mask: u8,
    pub id: TileId,
}

impl Tile {
    /// Arbitrary connector pattern. Used for hand-built boards; the generator
    /// only produces catalog shapes via `from_archetype`.
    pub fn with_mask(mask: u8, id: TileId) -> Self {
        Tile { mask: mask & 0x0F, id }
    }

    pub fn from_archetype(archetype: Archetype, rotation: u32, id: TileId) -> Self {
        Tile::with_mask(rotate_mask(archetype.mask(), rotation), id)
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Connectors as [up, right, down, left].
    pub fn connectors(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.has_connector(d))
    }

    pub fn has_connector(&self, dir: Direction) -> bool {
        self.mask & dir.bit() != 0
    }

    /// Same tile turned `k` steps clockwise. Identity is kept.
    pub fn rotated(self, k: u32) -> Tile {
        Tile { mask: rotate_mask(self.mask, k), id: self.id }
    }

    /// Make sure the tile is open toward `dir`.
    ///
    /// Returns the tile unchanged if it already is. Otherwise tries up to three
    /// rotations and returns the first one that opens `dir`. If none does (only
    /// possible for a mask outside the catalog, e.g. an empty one), a fresh
    /// straight tile exposing `dir` is built and given an identity from `mint`.
    pub fn ensure_connector(self, dir: Direction, mint: impl FnOnce() -> TileId) -> Tile {
        if self.has_connector(dir) {
            return self;
        }
        let mut t = self;
        for _ in 0..3 {
            t = t.rotated(1);
            if t.has_connector(dir) {
                return t;
            }
        }
        let straight = match dir {
            Direction::Left | Direction::Right => Archetype::Horizontal,
            Direction::Up | Direction::Down => Archetype::Vertical,
        };
        log::debug!("tile {:?} cannot open {:?}; replacing with {:?}", self.id, dir, straight);
        Tile::from_archetype(straight, 0, mint())
    }
}

/// Square board of tiles in row-major order: index = row * size + col.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    /// Fixed entry and exit cells for the level.
    pub start: usize,
    pub goal: usize,
}

impl Board {
    pub fn new(size: usize, tiles: Vec<Tile>, start: usize, goal: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        assert_eq!(tiles.len(), size * size, "board needs exactly size² tiles");
        assert!(start < tiles.len(), "start cell {} outside {}x{} board", start, size, size);
        assert!(goal < tiles.len(), "goal cell {} outside {}x{} board", goal, size, size);
        Board { size, tiles, start, goal }
    }

    /// Build a board from raw connector masks, numbering tile ids in cell order.
    pub fn from_masks(size: usize, masks: &[u8], start: usize, goal: usize) -> Self {
        let tiles = masks
            .iter()
            .enumerate()
            .map(|(i, &m)| Tile::with_mask(m, TileId(i as u32)))
            .collect();
        Board::new(size, tiles, start, goal)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, cell: usize) -> &Tile {
        &self.tiles[cell]
    }

    pub(crate) fn tile_mut(&mut self, cell: usize) -> &mut Tile {
        &mut self.tiles[cell]
    }

    /// Cell index of a (column, row) position. Panics outside the grid.
    pub fn index_of(&self, pos: UVec2) -> usize {
        let (col, row) = (pos.x as usize, pos.y as usize);
        assert!(col < self.size && row < self.size, "cell {} outside {}x{} board", pos, self.size, self.size);
        row * self.size + col
    }

    /// (column, row) of a cell index.
    pub fn pos_of(&self, cell: usize) -> UVec2 {
        UVec2::new((cell % self.size) as u32, (cell / self.size) as u32)
    }

    /// Grid neighbour of `cell` toward `dir`, if it lies inside the board.
    pub fn neighbor(&self, cell: usize, dir: Direction) -> Option<usize> {
        let next = self.pos_of(cell).as_ivec2() + dir.offset();
        let n = self.size as i32;
        if next.x < 0 || next.y < 0 || next.x >= n || next.y >= n {
            return None;
        }
        Some(next.y as usize * self.size + next.x as usize)
    }

    /// Traversal adjacency: `u` and `v` share an edge and both tiles are open toward each other.
    pub fn is_linked(&self, u: usize, v: usize) -> bool {
        Direction::ALL.iter().any(|&d| {
            self.neighbor(u, d) == Some(v)
                && self.tiles[u].has_connector(d)
                && self.tiles[v].has_connector(d.opposite())
        })
    }

    /// Exchange the tiles at two cells. Nothing else changes; callers re-query the path.
    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(a < self.tiles.len() && b < self.tiles.len(), "swap ({}, {}) outside board of {} cells", a, b, self.tiles.len());
        self.tiles.swap(a, b);
    }
}
