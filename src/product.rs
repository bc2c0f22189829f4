//! Access to source products.
//!
//! Product storage, pixel I/O and subset writing live
//! outside this crate; the subsetter only needs what is
//! described by the [`Product`] and [`SubsetExtractor`]
//! traits.

use ndarray::Array2;
use serde_derive::Serialize;

use crate::geocoding::GeoCoding;
use crate::geometry::{PixelRegion, RasterDims};
use crate::Result;

/// Description of a band of a product.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandInfo {
    pub name: String,
    /// Nominal spectral wavelength in nm, `0` for
    /// non-spectral bands (flags, angles, ...).
    pub spectral_wavelength: f32,
}

impl BandInfo {
    pub fn new(name: impl Into<String>, spectral_wavelength: f32) -> Self {
        BandInfo {
            name: name.into(),
            spectral_wavelength,
        }
    }

    #[inline]
    pub fn is_spectral(&self) -> bool {
        self.spectral_wavelength != 0.
    }
}

/// A tie-point grid, sampled at raster pixel positions.
pub trait TiePointGrid {
    fn pixel_value(&self, x: usize, y: usize) -> f32;
}

/// Validity of the pixels of one band over a window.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidMask {
    region: PixelRegion,
    /// Indexed as `(row, column)` relative to `region`.
    valid: Array2<bool>,
}

impl ValidMask {
    /// Wrap a `(rows, columns)` mask covering `region`.
    pub fn new(region: PixelRegion, valid: Array2<bool>) -> Self {
        debug_assert_eq!(
            valid.dim(),
            (region.height.max(0) as usize, region.width.max(0) as usize)
        );
        ValidMask { region, valid }
    }

    /// Validity of raster pixel `(x, y)`. Pixels outside the
    /// mask are invalid.
    #[inline]
    pub fn is_valid(&self, x: isize, y: isize) -> bool {
        if !self.region.contains(x, y) {
            return false;
        }
        let row = (y - self.region.y) as usize;
        let col = (x - self.region.x) as usize;
        self.valid[(row, col)]
    }

    pub fn region(&self) -> PixelRegion {
        self.region
    }
}

/// Raster access needed to compute a tile region.
pub trait Product {
    fn name(&self) -> &str;

    /// `(width, height)` of the scene raster.
    fn raster_size(&self) -> RasterDims;

    /// Bands in index order.
    fn bands(&self) -> &[BandInfo];

    /// Validity of the pixels of band `band` in `region`,
    /// which lies within the raster.
    fn valid_mask(&self, band: usize, region: PixelRegion) -> Result<ValidMask>;

    fn tie_point_grid(&self, name: &str) -> Option<&dyn TiePointGrid>;

    fn tie_point_grid_names(&self) -> Vec<String>;

    /// Names of metadata elements and attributes.
    fn metadata_names(&self) -> Vec<String>;

    fn geocoding(&self) -> Option<&dyn GeoCoding>;

    fn band_names(&self) -> Vec<String> {
        self.bands().iter().map(|b| b.name.clone()).collect()
    }
}

/// What to copy out of a product: the region, the nodes to
/// keep and the sampling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubsetDef {
    pub subset_name: String,
    pub region: PixelRegion,
    pub node_names: Vec<String>,
    pub sub_sampling: (usize, usize),
    pub ignore_metadata: bool,
}

impl SubsetDef {
    /// Subset of all tie-point grids, bands and metadata of
    /// `product` over `region`, at full resolution.
    pub fn for_product<P: Product + ?Sized>(product: &P, region: PixelRegion) -> Self {
        let mut node_names = product.tie_point_grid_names();
        node_names.extend(product.band_names());
        node_names.extend(product.metadata_names());
        SubsetDef {
            subset_name: product.name().to_string(),
            region,
            node_names,
            sub_sampling: (1, 1),
            ignore_metadata: false,
        }
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.node_names.iter().any(|n| n == name)
    }
}

/// Writes (or builds) the subset of a product.
pub trait SubsetExtractor<P: ?Sized> {
    type Output;

    fn extract(&self, product: &P, def: &SubsetDef) -> Result<Self::Output>;
}
