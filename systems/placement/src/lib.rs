#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid planning system that turns one placement attempt into per-tile
//! canvas assignments.
//!
//! The system owns no state. It reads the decoded image, walks the tile
//! grid twice (first validating every support block, then reserving a
//! canvas per tile), and reports the result as a [`GridPlan`]. The two
//! outbound host calls it needs, the solidity query and the canvas-id
//! allocator, are passed in as closures so the system stays independent of
//! any concrete host.

use mural_core::{
    BlockCoord, CanvasId, Facing, GridPlan, GridSize, PlacementError, PlannedTile, TileBinding,
    TILE_EDGE_PIXELS,
};
use mural_world::{CanvasRegistry, ImageStore};

/// Single placement attempt against a wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementRequest {
    anchor: BlockCoord,
    facing: Facing,
    image: String,
}

impl PlacementRequest {
    /// Creates a new request anchored at the clicked block.
    #[must_use]
    pub fn new(anchor: BlockCoord, facing: Facing, image: impl Into<String>) -> Self {
        Self {
            anchor,
            facing,
            image: image.into(),
        }
    }

    /// Block the user selected; the grid grows from its face.
    #[must_use]
    pub const fn anchor(&self) -> BlockCoord {
        self.anchor
    }

    /// Face of the anchor block the tiles are mounted against.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Name of the image the grid should display.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Computes the tile grid for a placement attempt.
///
/// The grid covers the image with `ceil(width / 128) * ceil(height / 128)`
/// tiles laid out from the block immediately beyond the anchor in the
/// facing direction, growing sideways along the wall and strictly downward.
/// Every tile needs a solid support block in the anchor's own plane, one
/// step behind the mounted tile; all support blocks are checked before any
/// canvas is reserved, so a rejected attempt leaves the registry untouched.
///
/// On success every tile carries a canvas identifier obtained through
/// [`CanvasRegistry::find_or_reserve`], which reuses an existing canvas for
/// any (image, offset) window that is already on display somewhere in the
/// world.
pub fn plan_placement<S, A>(
    request: &PlacementRequest,
    images: &mut ImageStore,
    canvases: &mut CanvasRegistry,
    mut is_solid: S,
    mut allocate: A,
) -> Result<GridPlan, PlacementError>
where
    S: FnMut(BlockCoord) -> bool,
    A: FnMut() -> Option<CanvasId>,
{
    let facing = request.facing();
    let Some((dx, dz)) = facing.lateral_deltas() else {
        return Err(PlacementError::InvalidFacing { facing });
    };

    let image = match images.load(request.image()) {
        Ok(image) => image,
        Err(error) => {
            return Err(PlacementError::ImageLoadFailed {
                image: request.image().to_owned(),
                reason: error.to_string(),
            })
        }
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(PlacementError::InvalidImage {
            image: request.image().to_owned(),
        });
    }
    let size = GridSize::covering(image.width(), image.height());

    let anchor = request.anchor();
    for column in 0..size.columns() {
        for row in 0..size.rows() {
            let cell = grid_cell(anchor, column, row, dx, dz);
            if !is_solid(cell) {
                return Err(PlacementError::UnsupportedPlacement { cell });
            }
        }
    }

    let (nx, ny, nz) = facing.normal_deltas();
    let origin = anchor.offset(nx, ny, nz);
    let capacity = usize::try_from(size.tile_count()).unwrap_or(0);
    let mut tiles = Vec::with_capacity(capacity);
    for column in 0..size.columns() {
        for row in 0..size.rows() {
            let binding = TileBinding::new(
                request.image(),
                column * TILE_EDGE_PIXELS,
                row * TILE_EDGE_PIXELS,
            );
            let Some(canvas) = canvases.find_or_reserve(binding.clone(), &mut allocate) else {
                return Err(PlacementError::CanvasExhausted);
            };
            tiles.push(PlannedTile {
                column,
                row,
                cell: grid_cell(origin, column, row, dx, dz),
                canvas,
                binding,
            });
        }
    }

    Ok(GridPlan::new(facing, size, tiles))
}

fn grid_cell(base: BlockCoord, column: u32, row: u32, dx: i32, dz: i32) -> BlockCoord {
    let lateral = i32::try_from(column).unwrap_or(i32::MAX);
    let descent = i32::try_from(row).unwrap_or(i32::MAX);
    base.offset(
        dx.saturating_mul(lateral),
        -descent,
        dz.saturating_mul(lateral),
    )
}
