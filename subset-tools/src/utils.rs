//! Utilities to open and create datasets, emit JSON and set
//! up logging.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gdal::raster::GdalType;
use gdal::{Dataset, DriverManager};
use serde::Serialize;
use tile_subset::geometry::PixelRegion;
use tracing_subscriber::EnvFilter;

use crate::Result;

pub type InputArgs = PathBuf;
pub struct OutputArgs {
    pub path: PathBuf,
    pub driver: String,
}

/// GDAL geo-transform of the sub-raster of `gt` starting at
/// the upper-left pixel of `region`.
pub fn sub_geo_transform(gt: &[f64; 6], region: &PixelRegion) -> [f64; 6] {
    let (x, y) = (region.x as f64, region.y as f64);
    [
        gt[0] + x * gt[1] + y * gt[2],
        gt[1],
        gt[2],
        gt[3] + x * gt[4] + y * gt[5],
        gt[4],
        gt[5],
    ]
}

/// Create a raster the size of `region`, georeferenced as
/// that window of `ds`.
pub fn create_output_raster<T: GdalType>(
    arg: &OutputArgs,
    ds: &Dataset,
    region: &PixelRegion,
    num_bands: isize,
) -> Result<Dataset> {
    let mut out_ds = {
        let driver = DriverManager::get_driver_by_name(&arg.driver)
            .with_context(|| format!("loading driver {}", arg.driver))?;
        driver
            .create_with_band_type::<T, _>(&arg.path, region.width, region.height, num_bands)
            .with_context(|| format!("creating dataset {}", arg.path.display()))?
    };
    if let Ok(gt) = ds.geo_transform() {
        out_ds.set_geo_transform(&sub_geo_transform(&gt, region))?;
    }
    out_ds.set_projection(&ds.projection())?;
    Ok(out_ds)
}

pub fn write_json<T: Serialize>(path: &Path, json: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let buf = std::io::BufWriter::with_capacity(0x100000, file);
    Ok(serde_json::to_writer_pretty(buf, json)?)
}

pub fn print_json<T: Serialize>(json: &T) -> Result<()> {
    let writer = std::io::BufWriter::new(std::io::stdout());
    serde_json::to_writer_pretty(writer, json)?;
    println!();
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
