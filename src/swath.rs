//! Overlap of a tile with a swath product, found by scanning
//! the geolocation tie-point grids row by row.
//!
//! Rows are sampled every [`SwathConfig::row_step`] lines
//! and only where the viewing condition (sun elevation)
//! passes. A row overlaps the tile when the latitude of its
//! first or last pixel falls within the tile's latitude
//! range, and likewise for longitude.
//!
//! The scan assumes that a swath crosses a tile in a single
//! contiguous band of rows: it returns the first run of
//! overlapping rows and stops looking as soon as that run
//! ends. A second crossing further down the swath is not
//! reported.
//!
//! Grid samples are `f32` and are widened to `f64` before
//! being compared with the tile bounds, which stay in `f64`.
//! A sample that is the `f32` rounding of a bound therefore
//! lands on whichever side of the bound the rounding put it,
//! instead of on the bound itself.

use tracing::{debug, warn};

use crate::config::SwathConfig;
use crate::geometry::{PixelRegion, RasterDims};
use crate::product::{Product, TiePointGrid};
use crate::tile::{LatLonBounds, Tile};
use crate::{Error, Result};

/// Geolocation and viewing-condition grids of a swath.
pub struct SwathGrids<'a> {
    pub latitude: &'a dyn TiePointGrid,
    pub longitude: &'a dyn TiePointGrid,
    pub view_condition: &'a dyn TiePointGrid,
}

impl<'a> SwathGrids<'a> {
    /// Look up the grids named in `config`.
    pub fn from_product<P: Product + ?Sized>(product: &'a P, config: &SwathConfig) -> Result<Self> {
        let grid = |name: &str| {
            product
                .tie_point_grid(name)
                .ok_or_else(|| Error::MissingTiePointGrid(name.to_string()))
        };
        Ok(SwathGrids {
            latitude: grid(&config.latitude_grid)?,
            longitude: grid(&config.longitude_grid)?,
            view_condition: grid(&config.view_condition_grid)?,
        })
    }

    /// Whether row `y` overlaps `bounds`, judged from its
    /// first and last pixel.
    fn row_inside(&self, y: usize, last_col: usize, bounds: &LatLonBounds) -> bool {
        let lat_inside = bounds.contains_lat(self.latitude.pixel_value(0, y) as f64)
            || bounds.contains_lat(self.latitude.pixel_value(last_col, y) as f64);
        lat_inside
            && (bounds.contains_lon(self.longitude.pixel_value(0, y) as f64)
                || bounds.contains_lon(self.longitude.pixel_value(last_col, y) as f64))
    }
}

/// Full-width region covering the first run of sampled rows
/// that overlap `bounds`, or `None` if no sampled row does.
///
/// The run is closed by the first sampled row after it that
/// passes the viewing condition but lies outside the tile;
/// that row is included in the height. A run still open when
/// the scan ends extends to its last overlapping row.
pub fn resolve_swath(
    dims: RasterDims,
    grids: &SwathGrids,
    bounds: &LatLonBounds,
    config: &SwathConfig,
) -> Option<PixelRegion> {
    let (width, height) = dims;
    if width == 0 || config.row_step == 0 {
        return None;
    }
    let last_col = width - 1;

    let mut open: Option<(usize, usize)> = None;
    for iy in (0..height).step_by(config.row_step) {
        // NaN never passes
        let view = grids.view_condition.pixel_value(0, iy);
        if !(view > config.min_view_condition) {
            continue;
        }
        let inside = grids.row_inside(iy, last_col, bounds);
        match (open, inside) {
            (None, true) => open = Some((iy, iy)),
            (Some((first, _)), true) => open = Some((first, iy)),
            (Some((first, _)), false) => {
                return Some(PixelRegion::new(
                    0,
                    first as isize,
                    width as isize,
                    (1 + iy - first) as isize,
                ));
            }
            (None, false) => {}
        }
    }

    open.map(|(first, last)| {
        warn!(first, last, "swath overlap still open at end of scan");
        PixelRegion::new(0, first as isize, width as isize, (1 + last - first) as isize)
    })
}

/// Overlap of `tile` with a swath `product`.
pub fn swath_overlap<P: Product + ?Sized>(
    product: &P,
    tile: &Tile,
    config: &SwathConfig,
) -> Result<Option<PixelRegion>> {
    let bounds = tile.lat_lon_bounds()?;
    let grids = SwathGrids::from_product(product, config)?;
    let region = resolve_swath(product.raster_size(), &grids, &bounds, config);
    debug!(tile = %tile.name, ?bounds, ?region, "swath scan done");
    Ok(region)
}
