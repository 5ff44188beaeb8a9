#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mural engine.
//!
//! This crate defines the vocabulary that connects the authoritative state
//! objects, the placement system, and the adapters. The placement system
//! consumes a request expressed in these types, queries the host through
//! closure seams, and answers with a [`GridPlan`] describing every display
//! tile the caller must materialize. Nothing in this crate performs I/O.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Side length in pixels of a single display tile.
pub const TILE_EDGE_PIXELS: u32 = 128;

/// Highest canvas identifier the host is able to allocate.
pub const MAX_CANVAS_ID: u16 = 32_767;

/// Unique identifier naming one renderable canvas surface.
///
/// Canvas identifiers are a globally scarce host resource; the registry in
/// `mural-world` guarantees that no two identifiers ever carry the same
/// [`TileBinding`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanvasId(u16);

impl CanvasId {
    /// Creates a new canvas identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Location of a single block expressed in voxel-world coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl BlockCoord {
    /// Creates a new block coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// East-west axis component of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical axis component of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// North-south axis component of the coordinate.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the coordinate displaced by the provided per-axis deltas.
    ///
    /// Components saturate at the numeric bounds rather than wrapping.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }
}

/// Face of a block that a display tile may be mounted against.
///
/// Horizontal faces follow the host compass: north points toward decreasing
/// `z`, south toward increasing `z`, east toward increasing `x`, and west
/// toward decreasing `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Face whose outward normal points toward decreasing `z`.
    North,
    /// Face whose outward normal points toward increasing `x`.
    East,
    /// Face whose outward normal points toward increasing `z`.
    South,
    /// Face whose outward normal points toward decreasing `x`.
    West,
    /// Upward face. Tiles cannot be mounted on it.
    Up,
    /// Downward face. Tiles cannot be mounted on it.
    Down,
}

impl Facing {
    /// Unit vector pointing out of the face, as `(dx, dy, dz)`.
    #[must_use]
    pub const fn normal_deltas(self) -> (i32, i32, i32) {
        match self {
            Self::North => (0, 0, -1),
            Self::East => (1, 0, 0),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::Up => (0, 1, 0),
            Self::Down => (0, -1, 0),
        }
    }

    /// In-plane horizontal deltas `(dx, dz)` that advance one tile column
    /// along a wall mounted on this face.
    ///
    /// Vertical faces have no in-plane horizontal axis and yield `None`.
    #[must_use]
    pub const fn lateral_deltas(self) -> Option<(i32, i32)> {
        match self {
            Self::North => Some((-1, 0)),
            Self::East => Some((0, -1)),
            Self::South => Some((1, 0)),
            Self::West => Some((0, 1)),
            Self::Up | Self::Down => None,
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        };
        write!(f, "{name}")
    }
}

/// Pairing of a source image with the pixel offset of one tile-sized window.
///
/// Equality over the full (image, offset) triple is the deduplication key:
/// two tiles anywhere in the world that show the same window of the same
/// image share one canvas identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBinding {
    image: String,
    offset_x: u32,
    offset_y: u32,
}

impl TileBinding {
    /// Creates a new binding for the provided image name and pixel offset.
    #[must_use]
    pub fn new(image: impl Into<String>, offset_x: u32, offset_y: u32) -> Self {
        Self {
            image: image.into(),
            offset_x,
            offset_y,
        }
    }

    /// Name of the source image file the binding samples from.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Horizontal pixel offset of the tile window within the source image.
    #[must_use]
    pub const fn offset_x(&self) -> u32 {
        self.offset_x
    }

    /// Vertical pixel offset of the tile window within the source image.
    #[must_use]
    pub const fn offset_y(&self) -> u32 {
        self.offset_y
    }
}

/// Dimensions of a tile grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Computes the smallest grid that covers an image of the provided pixel
    /// dimensions, one tile per started [`TILE_EDGE_PIXELS`] block.
    ///
    /// An image with a zero dimension yields an empty grid; callers reject
    /// such images before laying out tiles.
    #[must_use]
    pub const fn covering(width_pixels: u32, height_pixels: u32) -> Self {
        Self {
            columns: width_pixels.div_ceil(TILE_EDGE_PIXELS),
            rows: height_pixels.div_ceil(TILE_EDGE_PIXELS),
        }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles contained in the grid.
    #[must_use]
    pub const fn tile_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }
}

/// Single tile assignment produced by a successful placement plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedTile {
    /// Zero-based tile column within the grid.
    pub column: u32,
    /// Zero-based tile row within the grid, growing downward.
    pub row: u32,
    /// Block the display tile occupies, one step out from the wall.
    pub cell: BlockCoord,
    /// Canvas identifier the tile renders through.
    pub canvas: CanvasId,
    /// Image window bound to the canvas.
    pub binding: TileBinding,
}

/// Complete, validated layout for one placement attempt.
///
/// Plans are transient: they are computed fresh per attempt and never
/// persisted. The caller materializes one display entity per tile and binds
/// the tile's canvas to the paint source described by its binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPlan {
    facing: Facing,
    size: GridSize,
    tiles: Vec<PlannedTile>,
}

impl GridPlan {
    /// Creates a new plan from the provided layout and tile assignments.
    #[must_use]
    pub fn new(facing: Facing, size: GridSize, tiles: Vec<PlannedTile>) -> Self {
        Self {
            facing,
            size,
            tiles,
        }
    }

    /// Face the planned tiles are mounted against.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Dimensions of the planned grid measured in tiles.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Planned tile assignments in column-major order.
    #[must_use]
    pub fn tiles(&self) -> &[PlannedTile] {
        &self.tiles
    }

    /// Consumes the plan, yielding the underlying tile assignments.
    #[must_use]
    pub fn into_tiles(self) -> Vec<PlannedTile> {
        self.tiles
    }
}

/// Reasons a placement attempt may be rejected.
///
/// Every variant is recoverable at the boundary: the caller reports the
/// failure and discards the in-progress session. A rejected attempt leaves
/// the canvas registry and the world untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementError {
    /// The clicked face has no horizontal in-plane axis to lay tiles along.
    InvalidFacing {
        /// Face provided in the placement request.
        facing: Facing,
    },
    /// The source image could not be loaded or decoded.
    ImageLoadFailed {
        /// Name of the image that failed to load.
        image: String,
        /// Human-readable description of the underlying failure.
        reason: String,
    },
    /// The decoded image has no pixels along at least one axis.
    InvalidImage {
        /// Name of the rejected image.
        image: String,
    },
    /// A cell that would support the grid is not solid.
    UnsupportedPlacement {
        /// First support cell that failed the solidity check.
        cell: BlockCoord,
    },
    /// The host declined to allocate another canvas identifier.
    CanvasExhausted,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFacing { facing } => {
                write!(f, "tiles cannot be mounted on a {facing} face")
            }
            Self::ImageLoadFailed { image, reason } => {
                write!(f, "failed to load image {image:?}: {reason}")
            }
            Self::InvalidImage { image } => {
                write!(f, "image {image:?} has no pixels to display")
            }
            Self::UnsupportedPlacement { cell } => {
                write!(
                    f,
                    "support block at ({}, {}, {}) is not solid",
                    cell.x(),
                    cell.y(),
                    cell.z()
                )
            }
            Self::CanvasExhausted => {
                write!(f, "the host has no canvas identifiers left to allocate")
            }
        }
    }
}

impl Error for PlacementError {}
