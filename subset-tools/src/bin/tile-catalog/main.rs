/// # Tile-Catalog
/// Print the tiles of a tile coordinates catalog, with the
/// corner coordinates parsed to decimal degrees.
use anyhow::Context;
use clap::value_t;
use serde_derive::Serialize;
use std::path::PathBuf;
use subset_tools::{arg, args_parser, opt};
use subset_tools::{utils::*, Result};
use tile_subset::prelude::*;

// Main function
subset_tools::sync_main!(run());

#[derive(Serialize)]
struct TileSummary<'a> {
    #[serde(flatten)]
    tile: &'a Tile,
    bounds: LatLonBounds,
    /// `(lon, lat)` of each corner, in corner order.
    corners_deg: Vec<(f64, f64)>,
}

fn summarize(tile: &Tile) -> Result<TileSummary> {
    let corners_deg = tile
        .corners()
        .map(|(_, c)| -> tile_subset::Result<(f64, f64)> { Ok((c.lon_deg()?, c.lat_deg()?)) })
        .collect::<tile_subset::Result<Vec<_>>>()?;
    Ok(TileSummary {
        tile,
        bounds: tile.lat_lon_bounds()?,
        corners_deg,
    })
}

fn run() -> Result<()> {
    let args = parse_cmd_line();
    let catalog = TileCatalog::load(&args.catalog)
        .with_context(|| format!("loading tile catalog {}", args.catalog.display()))?;

    match &args.tile {
        Some(name) => {
            let tile = catalog.find(name)?;
            print_json(&summarize(tile).with_context(|| format!("parsing tile {}", name))?)
        }
        None => {
            let tiles = catalog
                .iter()
                .map(|tile| summarize(tile).with_context(|| format!("parsing tile {}", tile.name)))
                .collect::<Result<Vec<_>>>()?;
            print_json(&tiles)
        }
    }
}

/// Program arguments
struct Args {
    /// Catalog path
    catalog: PathBuf,
    /// Only print this tile
    tile: Option<String>,
}

fn parse_cmd_line() -> Args {
    let matches = args_parser!("tile-catalog", "List the tiles of a tile coordinates catalog.")
        .arg(
            arg!("catalog")
                .required(true)
                .help("Tile coordinates catalog (XML)"),
        )
        .arg(opt!("tile").short("t").help("Only print this tile"))
        .get_matches();

    let catalog = value_t!(matches, "catalog", PathBuf).unwrap_or_else(|e| e.exit());
    let tile = matches.value_of("tile").map(String::from);

    Args { catalog, tile }
}
