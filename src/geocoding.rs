//! Mapping between geodetic and pixel coordinates of a
//! product.

use geo::Coord;
use serde_derive::Serialize;

use crate::geometry::{apply, transform_from_gdal, PixelTransform};
use crate::{Error, Result};

/// Geodetic position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPos {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPos {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPos { lat, lon }
    }
}

/// Geocoding of a product. Pixel positions are continuous:
/// the upper-left corner of pixel `(i, j)` is at `(i, j)`.
pub trait GeoCoding {
    /// Pixel position of a geodetic position.
    fn pixel_pos(&self, pos: GeoPos) -> Result<Coord<f64>>;

    /// Geodetic position of a pixel position.
    fn geo_pos(&self, pixel: Coord<f64>) -> Result<GeoPos>;
}

impl<'a, G: GeoCoding + ?Sized> GeoCoding for &'a G {
    fn pixel_pos(&self, pos: GeoPos) -> Result<Coord<f64>> {
        (**self).pixel_pos(pos)
    }

    fn geo_pos(&self, pixel: Coord<f64>) -> Result<GeoPos> {
        (**self).geo_pos(pixel)
    }
}

/// Geocoding of a map-projected (plate-carrée) raster given
/// by an affine transform from pixel to `(lon, lat)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineGeoCoding {
    to_geo: PixelTransform,
    to_pixel: PixelTransform,
}

impl AffineGeoCoding {
    /// Build from a pixel → `(lon, lat)` transform. Fails if
    /// the transform is not invertible.
    pub fn new(to_geo: PixelTransform) -> Result<Self> {
        let to_pixel = to_geo.try_inverse().ok_or_else(|| Error::GeoCoding {
            lat: f64::NAN,
            lon: f64::NAN,
            reason: "geo-transform is not invertible".into(),
        })?;
        Ok(AffineGeoCoding { to_geo, to_pixel })
    }

    /// Build from a GDAL geo-transform in degrees.
    pub fn from_gdal(t: &[f64; 6]) -> Result<Self> {
        Self::new(transform_from_gdal(t))
    }

    /// Regular lat/lon grid with the upper-left corner at
    /// `(lon0, lat0)` and square pixels of `step` degrees.
    pub fn plate_carree(lon0: f64, lat0: f64, step: f64) -> Result<Self> {
        Self::from_gdal(&[lon0, step, 0., lat0, 0., -step])
    }

    /// Geocoding of the sub-raster whose upper-left pixel is
    /// `(dx, dy)` in this raster.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut shift = PixelTransform::identity();
        shift[(0, 2)] = dx;
        shift[(1, 2)] = dy;
        let mut unshift = PixelTransform::identity();
        unshift[(0, 2)] = -dx;
        unshift[(1, 2)] = -dy;
        AffineGeoCoding {
            to_geo: self.to_geo * shift,
            to_pixel: unshift * self.to_pixel,
        }
    }
}

impl GeoCoding for AffineGeoCoding {
    fn pixel_pos(&self, pos: GeoPos) -> Result<Coord<f64>> {
        let (x, y) = apply(&self.to_pixel, pos.lon, pos.lat);
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::GeoCoding {
                lat: pos.lat,
                lon: pos.lon,
                reason: "pixel position is not finite".into(),
            });
        }
        Ok(Coord { x, y })
    }

    fn geo_pos(&self, pixel: Coord<f64>) -> Result<GeoPos> {
        let (lon, lat) = apply(&self.to_geo, pixel.x, pixel.y);
        Ok(GeoPos { lat, lon })
    }
}
