#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Mural engine offline.
//!
//! The tool stands in for an interactive host: it keeps the images
//! directory and the bindings document on disk, plans placements against an
//! assumed-solid wall, and rasterizes single tiles to PNG files the way a
//! host paint callback would. Placement with real wall geometry is covered
//! by the placement system's own tests; this binary is for inspecting and
//! exercising the pipeline without a host attached.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use mural_core::{BlockCoord, CanvasId, Facing, GridSize, MAX_CANVAS_ID, TILE_EDGE_PIXELS};
use mural_persistence::{load_bindings, save_bindings};
use mural_rendering::render_tile;
use mural_system_placement::{plan_placement, PlacementRequest};
use mural_world::{CanvasRegistry, ImageStore, PlacementSessions};

/// Offline planner for wall-sized image displays.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the source images are resolved under.
    #[arg(long, default_value = "images")]
    images_dir: PathBuf,

    /// Bindings document read on startup and rewritten after changes.
    #[arg(long, default_value = "bindings.yml")]
    bindings: PathBuf,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Arm a placement for a user and immediately attempt it.
    Plan {
        /// User the placement session belongs to.
        #[arg(long, default_value = "console")]
        user: String,
        /// Image file to spread across the wall.
        #[arg(long)]
        image: String,
        /// Anchor block x coordinate.
        #[arg(long)]
        x: i32,
        /// Anchor block y coordinate.
        #[arg(long)]
        y: i32,
        /// Anchor block z coordinate.
        #[arg(long)]
        z: i32,
        /// Face of the anchor block the tiles mount against.
        #[arg(long, value_enum)]
        facing: FacingArg,
    },
    /// Report the tile grid an image would occupy.
    Tiles {
        /// Image file to measure.
        #[arg(long)]
        image: String,
    },
    /// Rasterize one tile of an image to a PNG file.
    Render {
        /// Image file to cut the tile from.
        #[arg(long)]
        image: String,
        /// Zero-based tile column.
        #[arg(long)]
        column: u32,
        /// Zero-based tile row.
        #[arg(long)]
        row: u32,
        /// Path of the PNG file to write.
        #[arg(long)]
        out: PathBuf,
    },
    /// List the persisted canvas bindings.
    Bindings,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FacingArg {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl From<FacingArg> for Facing {
    fn from(value: FacingArg) -> Self {
        match value {
            FacingArg::North => Facing::North,
            FacingArg::East => Facing::East,
            FacingArg::South => Facing::South,
            FacingArg::West => Facing::West,
            FacingArg::Up => Facing::Up,
            FacingArg::Down => Facing::Down,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.images_dir).with_context(|| {
        format!(
            "failed to create images directory at {}",
            args.images_dir.display()
        )
    })?;

    match &args.command {
        CliCommand::Plan {
            user,
            image,
            x,
            y,
            z,
            facing,
        } => run_plan(
            &args,
            user,
            image,
            BlockCoord::new(*x, *y, *z),
            Facing::from(*facing),
        ),
        CliCommand::Tiles { image } => run_tiles(&args, image),
        CliCommand::Render {
            image,
            column,
            row,
            out,
        } => run_render(&args, image, *column, *row, out),
        CliCommand::Bindings => run_bindings(&args),
    }
}

fn run_plan(args: &Args, user: &str, image: &str, anchor: BlockCoord, facing: Facing) -> Result<()> {
    let mut images = ImageStore::new(&args.images_dir);
    let mut canvases = CanvasRegistry::new();
    let restored = load_bindings(&args.bindings, &mut canvases, &mut images)?;
    if restored > 0 {
        info!("restored {restored} canvas bindings");
    }

    let mut sessions = PlacementSessions::new();
    sessions.begin(user, image);
    let Some(armed) = sessions.consume(user) else {
        info!("no placement armed for {user}");
        return Ok(());
    };

    let request = PlacementRequest::new(anchor, facing, armed);
    let mut allocate = sequential_allocator(&canvases);
    let plan = match plan_placement(&request, &mut images, &mut canvases, |_| true, &mut allocate)
    {
        Ok(plan) => plan,
        Err(error) => bail!("placement rejected: {error}"),
    };

    let size = plan.size();
    println!(
        "{} tiles ({} x {}) facing {}",
        size.tile_count(),
        size.columns(),
        size.rows(),
        plan.facing(),
    );
    for tile in plan.tiles() {
        println!(
            "  tile ({}, {}) at ({}, {}, {}) -> canvas {} window ({}, {})",
            tile.column,
            tile.row,
            tile.cell.x(),
            tile.cell.y(),
            tile.cell.z(),
            tile.canvas.get(),
            tile.binding.offset_x(),
            tile.binding.offset_y(),
        );
    }

    if let Err(error) = save_bindings(&args.bindings, &canvases) {
        warn!("failed to save bindings: {error:#}");
    }
    Ok(())
}

fn run_tiles(args: &Args, image: &str) -> Result<()> {
    let mut images = ImageStore::new(&args.images_dir);
    let source = images
        .load(image)
        .with_context(|| format!("cannot load image {image:?}"))?;
    let size = GridSize::covering(source.width(), source.height());

    println!(
        "{image}: {} x {} pixels -> {} x {} tiles ({} total)",
        source.width(),
        source.height(),
        size.columns(),
        size.rows(),
        size.tile_count(),
    );
    Ok(())
}

fn run_render(args: &Args, image: &str, column: u32, row: u32, out: &Path) -> Result<()> {
    let mut images = ImageStore::new(&args.images_dir);
    let source = images
        .load(image)
        .with_context(|| format!("cannot load image {image:?}"))?;
    let size = GridSize::covering(source.width(), source.height());
    if column >= size.columns() || row >= size.rows() {
        bail!(
            "tile ({column}, {row}) is outside the {} x {} grid of {image:?}",
            size.columns(),
            size.rows(),
        );
    }

    let tile = render_tile(source, column * TILE_EDGE_PIXELS, row * TILE_EDGE_PIXELS);
    tile.save(out)
        .with_context(|| format!("failed to write tile to {}", out.display()))?;
    println!("wrote tile ({column}, {row}) of {image:?} to {}", out.display());
    Ok(())
}

fn run_bindings(args: &Args) -> Result<()> {
    let mut images = ImageStore::new(&args.images_dir);
    let mut canvases = CanvasRegistry::new();
    let _ = load_bindings(&args.bindings, &mut canvases, &mut images)?;

    if canvases.is_empty() {
        println!("no canvas bindings recorded");
        return Ok(());
    }
    for (id, binding) in canvases.iter() {
        println!(
            "{:>5}  {}  window ({}, {})",
            id.get(),
            binding.image(),
            binding.offset_x(),
            binding.offset_y(),
        );
    }
    Ok(())
}

fn sequential_allocator(canvases: &CanvasRegistry) -> impl FnMut() -> Option<CanvasId> {
    let mut next = canvases
        .highest_id()
        .map_or(0, |id| u32::from(id.get()) + 1);
    move || {
        if next > u32::from(MAX_CANVAS_ID) {
            return None;
        }
        let id = CanvasId::new(next as u16);
        next += 1;
        Some(id)
    }
}
