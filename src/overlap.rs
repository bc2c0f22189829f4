//! Overlap of a tile footprint with a map-projected
//! (plate-carrée) raster.
//!
//! The footprint polygon is intersected with the raster
//! boundary and the bounding box of the intersection is the
//! candidate region.

use geo::{Area, BooleanOps, BoundingRect, Coord, Polygon, Rect};
use tracing::debug;

use crate::footprint::Footprint;
use crate::geometry::{PixelRegion, RasterDims};
use crate::Result;

/// Bounding region of the intersection between the raster
/// boundary `(0, 0)-(width, height)` and `footprint`. The
/// result is empty when they don't overlap.
pub fn resolve_plate_carree(dims: RasterDims, footprint: &Footprint) -> Result<PixelRegion> {
    footprint.validate()?;

    let scene: Polygon<f64> = Rect::new(
        Coord { x: 0., y: 0. },
        Coord {
            x: dims.0 as f64,
            y: dims.1 as f64,
        },
    )
    .into();
    let overlap = scene.intersection(&footprint.polygon());

    let region = if overlap.unsigned_area() == 0. {
        PixelRegion::default()
    } else {
        match overlap.bounding_rect() {
            // the intersection lies within the raster; clamp
            // away rounding noise on its edges
            Some(r) => PixelRegion::covering((r.min().x, r.min().y), (r.max().x, r.max().y))
                .clamp_to(dims),
            None => PixelRegion::default(),
        }
    };
    debug!(?region, "footprint overlap with raster boundary");
    Ok(region)
}
