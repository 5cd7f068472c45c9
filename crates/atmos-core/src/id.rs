//! Strongly-typed identifiers and grid addressing.

use std::fmt;

use crate::constants::CHUNK_DIM;

/// Position of a tile on the unbounded 2D grid.
///
/// Coordinates are signed and unbounded; tiles exist only where a
/// containing chunk has been created. Negative coordinates are first
/// class: chunk membership uses floored division, so tile `(-1, -1)`
/// lives in chunk `(-1, -1)`, not chunk `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// East-west coordinate.
    pub x: i32,
    /// North-south coordinate.
    pub y: i32,
}

impl TilePos {
    /// Create a tile position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent tile position in the given direction.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Key of the chunk containing this tile.
    pub fn chunk(self) -> ChunkKey {
        ChunkKey {
            x: self.x.div_euclid(CHUNK_DIM as i32),
            y: self.y.div_euclid(CHUNK_DIM as i32),
        }
    }

    /// Row-major index of this tile within its chunk, in `0..CHUNK_AREA`.
    pub fn local_index(self) -> usize {
        let lx = self.x.rem_euclid(CHUNK_DIM as i32) as usize;
        let ly = self.y.rem_euclid(CHUNK_DIM as i32) as usize;
        ly * CHUNK_DIM + lx
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Key identifying a chunk on the chunk lattice.
///
/// Chunk `(cx, cy)` covers tiles `[cx*16, cx*16+16) × [cy*16, cy*16+16)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    /// East-west chunk coordinate.
    pub x: i32,
    /// North-south chunk coordinate.
    pub y: i32,
}

impl ChunkKey {
    /// Create a chunk key.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile position of this chunk's origin (lowest x and y corner).
    pub fn origin(self) -> TilePos {
        TilePos {
            x: self.x * CHUNK_DIM as i32,
            y: self.y * CHUNK_DIM as i32,
        }
    }

    /// Tile position of the `i`-th cell of this chunk in row-major order.
    pub fn tile(self, i: usize) -> TilePos {
        let origin = self.origin();
        TilePos {
            x: origin.x + (i % CHUNK_DIM) as i32,
            y: origin.y + (i / CHUNK_DIM) as i32,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal neighbour directions.
///
/// The discriminant doubles as the index into per-direction arrays
/// such as cell velocity and neighbour tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Direction {
    /// Towards positive y.
    North = 0,
    /// Towards negative y.
    South = 1,
    /// Towards positive x.
    East = 2,
    /// Towards negative x.
    West = 3,
}

impl Direction {
    /// All four directions, in index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Array index of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The reverse direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Tile-coordinate offset of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{name}")
    }
}

/// Simulation layer a cell belongs to.
///
/// Each chunk stores one full grid of cells per layer. The environment
/// layer is driven by the tick pipeline; the pipe layer is driven by
/// pipe-net pooled operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Layer {
    /// Open-air tiles: rooms, corridors, space.
    Environment = 0,
    /// Sealed pipe segments.
    Pipe = 1,
}

impl Layer {
    /// Number of layers per chunk.
    pub const COUNT: usize = 2;

    /// Array index of this layer.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Environment => "environment",
            Layer::Pipe => "pipe",
        };
        write!(f, "{name}")
    }
}

/// Identifies a connected pipe network.
///
/// Net IDs are allocated from a monotonic counter and never reused,
/// even after merges and splits retire a net.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub u32);

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net {}", self.0)
    }
}

impl From<u32> for NetId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the simulation advances one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
