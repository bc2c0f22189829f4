//! Pixel-space primitives: raster sizes, windows, affine
//! transforms and the overlap region type.

use nalgebra::{Matrix3, Point2};
use serde_derive::Serialize;

/// `(width, height)` of a raster or window.
pub type RasterDims = (usize, usize);
/// `(x, y)` offset of a window.
pub type RasterOffset = (isize, isize);
/// Offset and size of a window.
pub type RasterWindow = (RasterOffset, RasterDims);

/// Affine transform in homogeneous coordinates.
pub type PixelTransform = Matrix3<f64>;

/// Convert a GDAL style geo-transform into a
/// [`PixelTransform`] mapping pixel `(x, y)` to world
/// `(X, Y)`.
pub fn transform_from_gdal(t: &[f64; 6]) -> PixelTransform {
    Matrix3::new(
        t[1], t[2], t[0], //
        t[4], t[5], t[3], //
        0., 0., 1.,
    )
}

/// Apply a [`PixelTransform`] to a point.
#[inline]
pub fn apply(t: &PixelTransform, x: f64, y: f64) -> (f64, f64) {
    let pt = t.transform_point(&Point2::new(x, y));
    (pt.x, pt.y)
}

/// Rectangle in source raster pixel coordinates.
///
/// Width and height may become zero or negative while
/// searching; [`PixelRegion::is_empty`] is true for those.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PixelRegion {
    pub x: isize,
    pub y: isize,
    pub width: isize,
    pub height: isize,
}

impl PixelRegion {
    pub fn new(x: isize, y: isize, width: isize, height: isize) -> Self {
        PixelRegion {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest integer region containing the given
    /// floating-point bounds.
    pub fn covering(min: (f64, f64), max: (f64, f64)) -> Self {
        let x = min.0.floor() as isize;
        let y = min.1.floor() as isize;
        PixelRegion {
            x,
            y,
            width: max.0.ceil() as isize - x,
            height: max.1.ceil() as isize - y,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// One past the last column.
    #[inline]
    pub fn right(&self) -> isize {
        self.x + self.width
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> isize {
        self.y + self.height
    }

    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Part of `self` inside a raster of size `dims`.
    pub fn clamp_to(&self, dims: RasterDims) -> Self {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let r = self.right().min(dims.0 as isize);
        let b = self.bottom().min(dims.1 as isize);
        PixelRegion::new(x, y, (r - x).max(0), (b - y).max(0))
    }

    /// The region as a window to read from a raster. `None`
    /// if the region is empty.
    pub fn window(&self) -> Option<RasterWindow> {
        if self.is_empty() {
            None
        } else {
            Some((
                (self.x, self.y),
                (self.width as usize, self.height as usize),
            ))
        }
    }
}
