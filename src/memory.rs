//! Products held in memory.
//!
//! [`MemProduct`] keeps band data in `ndarray`s and tie-point
//! grids as [`TiePointRaster`]s. It backs the tests and is a
//! reference for what a [`Product`] has to provide.
//! [`MemoryExtractor`] builds the subset of a `MemProduct`.

use ndarray::{s, Array2};

use crate::geocoding::{AffineGeoCoding, GeoCoding};
use crate::geometry::{PixelRegion, RasterDims};
use crate::product::{BandInfo, Product, SubsetDef, SubsetExtractor, TiePointGrid, ValidMask};
use crate::{Error, Result};

/// A coarse grid of samples, bilinearly interpolated (and
/// extrapolated at the borders) to raster pixel centres.
///
/// Grid point `(i, j)` sits at raster position
/// `(offset.0 + i * sub_sampling.0, offset.1 + j * sub_sampling.1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TiePointRaster {
    data: Array2<f32>,
    offset: (f64, f64),
    sub_sampling: (f64, f64),
}

impl TiePointRaster {
    /// `data` is indexed `(row, column)`.
    pub fn new(data: Array2<f32>, offset: (f64, f64), sub_sampling: (f64, f64)) -> Self {
        TiePointRaster {
            data,
            offset,
            sub_sampling,
        }
    }

    /// One grid point per raster pixel.
    pub fn full_resolution(data: Array2<f32>) -> Self {
        Self::new(data, (0.5, 0.5), (1., 1.))
    }

    /// Same samples, positioned for the sub-raster starting at
    /// pixel `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        TiePointRaster {
            data: self.data.clone(),
            offset: (self.offset.0 - dx, self.offset.1 - dy),
            sub_sampling: self.sub_sampling,
        }
    }

    /// Value at continuous raster position `(x, y)`.
    pub fn interpolate(&self, x: f64, y: f64) -> f32 {
        let (rows, cols) = self.data.dim();
        if rows == 0 || cols == 0 {
            return f32::NAN;
        }
        let (i0, wx) = cell((x - self.offset.0) / self.sub_sampling.0, cols);
        let (j0, wy) = cell((y - self.offset.1) / self.sub_sampling.1, rows);
        let i1 = (i0 + 1).min(cols - 1);
        let j1 = (j0 + 1).min(rows - 1);

        let d = &self.data;
        let top = d[(j0, i0)] as f64 * (1. - wx) + d[(j0, i1)] as f64 * wx;
        let bot = d[(j1, i0)] as f64 * (1. - wx) + d[(j1, i1)] as f64 * wx;
        (top * (1. - wy) + bot * wy) as f32
    }
}

/// Grid cell index and weight for fractional grid position
/// `f` on an axis of `n` points.
fn cell(f: f64, n: usize) -> (usize, f64) {
    if n == 1 {
        return (0, 0.);
    }
    let i = (f.floor().max(0.) as usize).min(n - 2);
    (i, f - i as f64)
}

impl TiePointGrid for TiePointRaster {
    fn pixel_value(&self, x: usize, y: usize) -> f32 {
        self.interpolate(x as f64 + 0.5, y as f64 + 0.5)
    }
}

struct MemBand {
    data: Array2<f64>,
    no_data: Option<f64>,
}

/// In-memory product.
pub struct MemProduct {
    name: String,
    dims: RasterDims,
    band_info: Vec<BandInfo>,
    bands: Vec<MemBand>,
    grids: Vec<(String, TiePointRaster)>,
    metadata: Vec<String>,
    geocoding: Option<AffineGeoCoding>,
}

impl MemProduct {
    pub fn new(name: impl Into<String>, dims: RasterDims) -> Self {
        MemProduct {
            name: name.into(),
            dims,
            band_info: vec![],
            bands: vec![],
            grids: vec![],
            metadata: vec![],
            geocoding: None,
        }
    }

    /// Add a band. `data` is `(rows, columns)` and must match
    /// the raster size. NaN and `no_data` pixels are invalid.
    pub fn with_band(mut self, info: BandInfo, data: Array2<f64>, no_data: Option<f64>) -> Result<Self> {
        if data.dim() != (self.dims.1, self.dims.0) {
            return Err(Error::Config(format!(
                "band {} has shape {:?}, raster is {}x{}",
                info.name,
                data.dim(),
                self.dims.0,
                self.dims.1
            )));
        }
        self.band_info.push(info);
        self.bands.push(MemBand { data, no_data });
        Ok(self)
    }

    pub fn with_tie_point_grid(mut self, name: impl Into<String>, grid: TiePointRaster) -> Self {
        self.grids.push((name.into(), grid));
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>) -> Self {
        self.metadata.push(name.into());
        self
    }

    pub fn with_geocoding(mut self, geocoding: AffineGeoCoding) -> Self {
        self.geocoding = Some(geocoding);
        self
    }

    pub fn band_data(&self, name: &str) -> Option<&Array2<f64>> {
        self.band_info
            .iter()
            .position(|b| b.name == name)
            .map(|i| &self.bands[i].data)
    }

    pub fn tie_point_raster(&self, name: &str) -> Option<&TiePointRaster> {
        self.grids.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }

    pub fn affine_geocoding(&self) -> Option<&AffineGeoCoding> {
        self.geocoding.as_ref()
    }
}

impl Product for MemProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn raster_size(&self) -> RasterDims {
        self.dims
    }

    fn bands(&self) -> &[BandInfo] {
        &self.band_info
    }

    fn valid_mask(&self, band: usize, region: PixelRegion) -> Result<ValidMask> {
        let band = self
            .bands
            .get(band)
            .ok_or_else(|| Error::Config(format!("no band at index {}", band)))?;
        let region = region.clamp_to(self.dims);
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        let no_data = band.no_data;
        let valid = band
            .data
            .slice(s![y..y + h, x..x + w])
            .map(|&v| !v.is_nan() && Some(v) != no_data);
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

/// Builds the subset of a [`MemProduct`] in memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryExtractor;

impl SubsetExtractor<MemProduct> for MemoryExtractor {
    type Output = MemProduct;

    fn extract(&self, product: &MemProduct, def: &SubsetDef) -> Result<MemProduct> {
        let region = def.region;
        if region.is_empty() || region.clamp_to(product.dims) != region {
            return Err(Error::Config(format!(
                "subset region {:?} is not inside the {}x{} raster",
                region, product.dims.0, product.dims.1
            )));
        }
        if def.sub_sampling != (1, 1) {
            return Err(Error::Config("only 1x1 sub-sampling is supported".into()));
        }
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);
        let (dx, dy) = (region.x as f64, region.y as f64);

        let mut out = MemProduct::new(def.subset_name.clone(), (w, h));
        for (info, band) in product.band_info.iter().zip(&product.bands) {
            if def.contains_node(&info.name) {
                let data = band.data.slice(s![y..y + h, x..x + w]).to_owned();
                out = out.with_band(info.clone(), data, band.no_data)?;
            }
        }
        for (name, grid) in &product.grids {
            if def.contains_node(name) {
                out = out.with_tie_point_grid(name.clone(), grid.translated(dx, dy));
            }
        }
        if !def.ignore_metadata {
            for name in product.metadata.iter().filter(|n| def.contains_node(n)) {
                out = out.with_metadata(name.clone());
            }
        }
        if let Some(gc) = &product.geocoding {
            out = out.with_geocoding(gc.translated(dx, dy));
        }
        Ok(out)
    }
}
