//! Write the subset of a [`GdalProduct`] with GDAL.

use std::path::PathBuf;

use gdal::raster::Buffer;
use gdal::Metadata;
use ndarray::Array2;
use tile_subset::reader::{GdalProduct, WindowReader};
use tile_subset::{Error, Product, SubsetDef, SubsetExtractor};
use tracing::{debug, info};

use crate::utils::{create_output_raster, OutputArgs};

/// Writes every band and tie-point grid listed in a
/// [`SubsetDef`] as a `f64` band of a new dataset, and the
/// listed dataset metadata items unless they are ignored.
pub struct GdalExtractor {
    pub output: OutputArgs,
}

impl SubsetExtractor<GdalProduct> for GdalExtractor {
    type Output = PathBuf;

    fn extract(&self, product: &GdalProduct, def: &SubsetDef) -> tile_subset::Result<PathBuf> {
        if def.sub_sampling != (1, 1) {
            return Err(Error::Config("only 1x1 sub-sampling is supported".into()));
        }
        let region = def.region;
        let (off, size) = region
            .window()
            .ok_or_else(|| Error::Config(format!("empty subset region {:?}", region)))?;

        // Tie-point grids are full-resolution bands in GDAL
        // products, so they are copied like any other band.
        let grids: Vec<_> = product
            .tie_point_grid_names()
            .into_iter()
            .filter(|n| def.contains_node(n))
            .collect();
        let bands: Vec<_> = product
            .bands()
            .iter()
            .filter(|b| def.contains_node(&b.name))
            .collect();
        let num_bands = (grids.len() + bands.len()) as isize;

        let mut out_ds = create_output_raster::<f64>(&self.output, product.dataset(), &region, num_bands)
            .map_err(|e| Error::Config(format!("{:#}", e)))?;
        out_ds.set_description(&def.subset_name)?;

        let mut out_index = 1;
        for name in &grids {
            if let Some(grid) = product.tie_point_raster(name) {
                let data: Vec<f64> = (0..size.1)
                    .flat_map(|y| (0..size.0).map(move |x| (x, y)))
                    .map(|(x, y)| {
                        grid.interpolate(
                            (off.0 as usize + x) as f64 + 0.5,
                            (off.1 as usize + y) as f64 + 0.5,
                        ) as f64
                    })
                    .collect();
                let mut band = out_ds.rasterband(out_index)?;
                band.write((0, 0), size, &Buffer::new(size, data))?;
                band.set_description(name)?;
            }
            out_index += 1;
        }

        for info in bands {
            if let Some(index) = product.band_index(&info.name) {
                let src = product.dataset().rasterband(index)?;
                let data: Array2<f64> = WindowReader::read_as_array(&src, off, size)?;
                let mut band = out_ds.rasterband(out_index)?;
                band.write((0, 0), size, &Buffer::new(size, data.into_raw_vec()))?;
                band.set_description(&info.name)?;
                if info.is_spectral() {
                    band.set_metadata_item("wavelength", &info.spectral_wavelength.to_string(), "")?;
                }
                if let Some(no_data) = product.no_data_value(&info.name) {
                    band.set_no_data_value(Some(no_data))?;
                }
                debug!(band = %info.name, index = out_index, "copied band");
            }
            out_index += 1;
        }

        if !def.ignore_metadata {
            for item in product.dataset().metadata_domain("").unwrap_or_default() {
                if let Some((key, value)) = item.split_once('=') {
                    if def.contains_node(key) {
                        out_ds.set_metadata_item(key, value, "")?;
                    }
                }
            }
        }

        info!(
            path = %self.output.path.display(),
            driver = %self.output.driver,
            bands = num_bands,
            "wrote subset"
        );
        Ok(self.output.path.clone())
    }
}
