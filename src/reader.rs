//! GDAL-backed products.
//!
//! Every raster band of the dataset is a product band, named
//! by its description and carrying its wavelength from the
//! `wavelength` metadata item. Bands named like the swath
//! geolocation grids of a [`SwathConfig`] are read fully and
//! exposed as tie-point grids instead.

use std::path::Path;

use gdal::{
    raster::{GdalType, RasterBand},
    Dataset, Metadata,
};
use ndarray::Array2;
use tracing::debug;

use crate::config::SwathConfig;
use crate::geocoding::{AffineGeoCoding, GeoCoding};
use crate::geometry::{PixelRegion, RasterDims, RasterOffset};
use crate::memory::TiePointRaster;
use crate::product::{BandInfo, Product, TiePointGrid, ValidMask};
use crate::{Error, Result};

/// Reads rectangular windows of a raster band.
pub trait WindowReader {
    /// Read the window at `off` of size `size` as a
    /// `(rows, columns)` array.
    fn read_as_array<T>(&self, off: RasterOffset, size: RasterDims) -> Result<Array2<T>>
    where
        T: GdalType + Copy;

    /// Read the window covered by `region`.
    fn read_region<T>(&self, region: PixelRegion) -> Result<Array2<T>>
    where
        T: GdalType + Copy,
    {
        match region.window() {
            Some((off, size)) => self.read_as_array(off, size),
            None => Ok(Array2::from_shape_vec(
                (region.height.max(0) as usize, region.width.max(0) as usize),
                vec![],
            )?),
        }
    }
}

impl<'a> WindowReader for RasterBand<'a> {
    fn read_as_array<T>(&self, off: RasterOffset, size: RasterDims) -> Result<Array2<T>>
    where
        T: GdalType + Copy,
    {
        let buf = self.read_as::<T>(off, size, size, None)?;
        Ok(Array2::from_shape_vec((size.1, size.0), buf.data)?)
    }
}

/// Name of band `index` (1-based): its description, or
/// `band_<index>` when it has none.
fn band_name(band: &RasterBand, index: isize) -> String {
    band.description()
        .ok()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("band_{}", index))
}

fn band_wavelength(band: &RasterBand) -> f32 {
    band.metadata_item("wavelength", "")
        .and_then(|w| w.trim().parse().ok())
        .unwrap_or(0.)
}

/// Product read through GDAL.
pub struct GdalProduct {
    dataset: Dataset,
    name: String,
    dims: RasterDims,
    bands: Vec<BandInfo>,
    /// 1-based GDAL index of each entry of `bands`.
    band_indices: Vec<isize>,
    no_data: Vec<Option<f64>>,
    grids: Vec<(String, TiePointRaster)>,
    metadata: Vec<String>,
    geocoding: Option<AffineGeoCoding>,
}

impl GdalProduct {
    /// Open the dataset at `path`. Bands named in `swath` are
    /// loaded as tie-point grids.
    pub fn open<P: AsRef<Path>>(path: P, swath: &SwathConfig) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::open(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_dataset(dataset, name, swath)
    }

    pub fn from_dataset(dataset: Dataset, name: String, swath: &SwathConfig) -> Result<Self> {
        let dims = dataset.raster_size();
        let grid_names = [
            &swath.latitude_grid,
            &swath.longitude_grid,
            &swath.view_condition_grid,
        ];

        let mut bands = vec![];
        let mut band_indices = vec![];
        let mut no_data = vec![];
        let mut grids = vec![];
        for index in 1..=dataset.raster_count() {
            let band = dataset.rasterband(index)?;
            let name = band_name(&band, index);
            if grid_names.iter().any(|g| **g == name) {
                let data: Array2<f32> = WindowReader::read_as_array(&band, (0, 0), dims)?;
                grids.push((name, TiePointRaster::full_resolution(data)));
            } else {
                bands.push(BandInfo::new(name, band_wavelength(&band)));
                band_indices.push(index);
                no_data.push(band.no_data_value());
            }
        }

        let metadata = dataset
            .metadata_domain("")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| item.split('=').next().map(str::to_string))
            .collect();

        let geocoding = match dataset.geo_transform() {
            Ok(gt) => AffineGeoCoding::from_gdal(&gt).ok(),
            Err(_) => None,
        };

        debug!(
            product = %name,
            bands = bands.len(),
            grids = grids.len(),
            geocoded = geocoding.is_some(),
            "opened GDAL product"
        );
        Ok(GdalProduct {
            dataset,
            name,
            dims,
            bands,
            band_indices,
            no_data,
            grids,
            metadata,
            geocoding,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// GDAL band index of the product band named `name`.
    pub fn band_index(&self, name: &str) -> Option<isize> {
        self.bands
            .iter()
            .position(|b| b.name == name)
            .map(|i| self.band_indices[i])
    }

    pub fn no_data_value(&self, name: &str) -> Option<f64> {
        self.bands
            .iter()
            .position(|b| b.name == name)
            .and_then(|i| self.no_data[i])
    }

    pub fn tie_point_raster(&self, name: &str) -> Option<&TiePointRaster> {
        self.grids.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }
}

impl Product for GdalProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn raster_size(&self) -> RasterDims {
        self.dims
    }

    fn bands(&self) -> &[BandInfo] {
        &self.bands
    }

    fn valid_mask(&self, band: usize, region: PixelRegion) -> Result<ValidMask> {
        let index = *self
            .band_indices
            .get(band)
            .ok_or_else(|| Error::Config(format!("no band at index {}", band)))?;
        let region = region.clamp_to(self.dims);
        let data = self.dataset.rasterband(index)?.read_region::<f64>(region)?;
        let no_data = self.no_data[band];
        let valid = data.map(|&v| !v.is_nan() && Some(v) != no_data);
        Ok(ValidMask::new(region, valid))
    }

    fn tie_point_grid(&self, name: &str) -> Option<&dyn TiePointGrid> {
        self.tie_point_raster(name).map(|g| g as &dyn TiePointGrid)
    }

    fn tie_point_grid_names(&self) -> Vec<String> {
        self.grids.iter().map(|(n, _)| n.clone()).collect()
    }

    fn metadata_names(&self) -> Vec<String> {
        self.metadata.clone()
    }

    fn geocoding(&self) -> Option<&dyn GeoCoding> {
        self.geocoding.as_ref().map(|g| g as &dyn GeoCoding)
    }
}
