//! Tile subsetting: find the region of a product covered by
//! a catalog tile and copy it out.

use tracing::info;

use crate::config::{Instrument, SubsetParams};
use crate::catalog::TileCatalog;
use crate::footprint::project_footprint;
use crate::geometry::PixelRegion;
use crate::overlap::resolve_plate_carree;
use crate::product::{Product, SubsetDef, SubsetExtractor};
use crate::swath::swath_overlap;
use crate::tile::Tile;
use crate::trim::trim_to_valid_pixels;
use crate::{Error, Result};

/// Region of `product` covered by the tile named in `params`.
///
/// Fails with [`Error::RegionTooSmall`] when there is no
/// overlap or either side is shorter than
/// `params.min_region_size`.
pub fn tile_region<P: Product + ?Sized>(
    product: &P,
    catalog: &TileCatalog,
    params: &SubsetParams,
) -> Result<PixelRegion> {
    let instrument = params.validate()?;
    let tile = catalog.find(&params.tile_name)?;

    let region = match instrument {
        Instrument::Vgt => Some(plate_carree_region(product, tile)?),
        Instrument::Aatsr => swath_overlap(product, tile, &params.swath)?,
    };
    let region = check_min_size(region, params.min_region_size)?;
    info!(
        product = product.name(),
        tile = %tile.name,
        instrument = instrument.as_str(),
        ?region,
        "resolved tile region"
    );
    Ok(region)
}

fn plate_carree_region<P: Product + ?Sized>(product: &P, tile: &Tile) -> Result<PixelRegion> {
    let geocoding = product.geocoding().ok_or(Error::MissingGeoCoding)?;
    let footprint = project_footprint(tile, geocoding)?;
    let region = resolve_plate_carree(product.raster_size(), &footprint)?;
    trim_to_valid_pixels(product, region)
}

/// Accept `region` only if both sides reach `min_size`.
pub fn check_min_size(region: Option<PixelRegion>, min_size: usize) -> Result<PixelRegion> {
    let min = min_size as isize;
    match region {
        Some(r) if r.width >= min && r.height >= min => Ok(r),
        Some(r) => Err(Error::RegionTooSmall(format!(
            "{}x{} at ({}, {}), need at least {}x{}",
            r.width.max(0),
            r.height.max(0),
            r.x,
            r.y,
            min_size,
            min_size
        ))),
        None => Err(Error::RegionTooSmall("no overlap with the product".into())),
    }
}

/// Resolve the tile region of `product` and hand the subset
/// to `extractor`.
pub fn subset<P, E>(
    product: &P,
    catalog: &TileCatalog,
    params: &SubsetParams,
    extractor: &E,
) -> Result<E::Output>
where
    P: Product + ?Sized,
    E: SubsetExtractor<P>,
{
    let region = tile_region(product, catalog, params)?;
    let def = SubsetDef::for_product(product, region);
    extractor.extract(product, &def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::fixture;
    use crate::geocoding::AffineGeoCoding;
    use crate::memory::{MemProduct, MemoryExtractor, TiePointRaster};
    use crate::product::BandInfo;
    use ndarray::Array2;

    const STEP: f64 = 1. / 32.;

    /// 1/32 degree grid from 10W 60N. Tile h18v04 projects
    /// to x in 320..817.83 and y in 320..640.
    fn vgt_product(data: Array2<f64>) -> MemProduct {
        MemProduct::new("V2KRNP____20080801F", (900, 700))
            .with_band(BandInfo::new("SM", 0.), Array2::zeros((700, 900)), None)
            .unwrap()
            .with_band(BandInfo::new("B0", 450.), data, Some(-1.))
            .unwrap()
            .with_metadata("Processing_Graph")
            .with_geocoding(AffineGeoCoding::plate_carree(-10., 60., STEP).unwrap())
    }

    /// Swath with latitude falling 0.02 degrees per row from
    /// 60N; rows 500..=999 are inside h18v04.
    fn aatsr_product() -> MemProduct {
        let rows = 64;
        let lat = Array2::from_shape_fn((rows, 17), |(j, _)| {
            (60. - 0.02 * (0.5 + 32. * j as f64)) as f32
        });
        let grid = |data| TiePointRaster::new(data, (0.5, 0.5), (32., 32.));
        MemProduct::new("ATS_TOA_1P", (512, 2000))
            .with_tie_point_grid("latitude", grid(lat))
            .with_tie_point_grid("longitude", grid(Array2::from_elem((rows, 17), 5.)))
            .with_tie_point_grid("sun_elev_nadir", grid(Array2::from_elem((rows, 17), 45.)))
    }

    #[test]
    fn vgt_region_is_footprint_bounding_box() {
        let p = vgt_product(Array2::from_elem((700, 900), 1.));
        let params = SubsetParams::new("h18v04");
        let r = tile_region(&p, &fixture(), &params).unwrap();
        assert_eq!(r, PixelRegion::new(320, 320, 498, 320));
    }

    #[test]
    fn vgt_region_is_trimmed() {
        let data = Array2::from_shape_fn((700, 900), |(y, x)| {
            if x >= 700 || y < 400 {
                f64::NAN
            } else {
                1.
            }
        });
        let p = vgt_product(data);
        let r = tile_region(&p, &fixture(), &SubsetParams::new("h18v04")).unwrap();
        assert_eq!(r, PixelRegion::new(320, 400, 380, 240));
    }

    #[test]
    fn vgt_without_spectral_band_fails() {
        let p = MemProduct::new("p", (900, 700))
            .with_band(BandInfo::new("SM", 0.), Array2::zeros((700, 900)), None)
            .unwrap()
            .with_geocoding(AffineGeoCoding::plate_carree(-10., 60., STEP).unwrap());
        let err = tile_region(&p, &fixture(), &SubsetParams::new("h18v04")).unwrap_err();
        assert!(matches!(err, Error::NoSpectralBand));
        assert_eq!(err.stage(), "trimming");
    }

    #[test]
    fn vgt_without_geocoding_fails() {
        let p = MemProduct::new("p", (10, 10));
        let err = tile_region(&p, &fixture(), &SubsetParams::new("h18v04")).unwrap_err();
        assert!(matches!(err, Error::MissingGeoCoding));
    }

    #[test]
    fn vgt_small_overlap_is_rejected() {
        // h19v04 only covers the eastern 163 columns
        let p = vgt_product(Array2::from_elem((700, 900), 1.));
        let err = tile_region(&p, &fixture(), &SubsetParams::new("h19v04")).unwrap_err();
        assert!(matches!(err, Error::RegionTooSmall(_)));
        assert_eq!(err.stage(), "minimum-size check");
    }

    #[test]
    fn vgt_fully_invalid_region_is_rejected() {
        let p = vgt_product(Array2::from_elem((700, 900), -1.));
        let err = tile_region(&p, &fixture(), &SubsetParams::new("h18v04")).unwrap_err();
        assert!(matches!(err, Error::RegionTooSmall(_)));
    }

    /// Swath with full-resolution grids: latitude by row,
    /// longitude 5E, always daylight.
    fn swath_product(dims: (usize, usize), lat: impl Fn(usize) -> f32) -> MemProduct {
        let shape = (dims.1, dims.0);
        let grid = TiePointRaster::full_resolution;
        MemProduct::new("ATS_TOA_1P", dims)
            .with_tie_point_grid("latitude", grid(Array2::from_shape_fn(shape, |(y, _)| lat(y))))
            .with_tie_point_grid("longitude", grid(Array2::from_elem(shape, 5.)))
            .with_tie_point_grid("sun_elev_nadir", grid(Array2::from_elem(shape, 45.)))
    }

    #[test]
    fn aatsr_short_run_is_rejected() {
        // only rows 500..600 lie in h18v04; row 600 closes the run
        let p = swath_product((512, 1000), |y| if (500..600).contains(&y) { 45. } else { 70. });
        let params = SubsetParams::new("h18v04").with_instrument("AATSR");
        match tile_region(&p, &fixture(), &params) {
            Err(Error::RegionTooSmall(msg)) => {
                assert_eq!(msg, "512x101 at (0, 500), need at least 200x200")
            }
            other => panic!("expected RegionTooSmall, got {:?}", other),
        }

        let mut params = params;
        params.min_region_size = 101;
        assert_eq!(
            tile_region(&p, &fixture(), &params).unwrap(),
            PixelRegion::new(0, 500, 512, 101)
        );
    }

    #[test]
    fn aatsr_narrow_swath_is_rejected() {
        let p = swath_product((150, 2000), |y| (60. - 0.02 * (y as f64 + 0.5)) as f32);
        let params = SubsetParams::new("h18v04").with_instrument("AATSR");
        match tile_region(&p, &fixture(), &params) {
            Err(Error::RegionTooSmall(msg)) => {
                assert_eq!(msg, "150x501 at (0, 500), need at least 200x200")
            }
            other => panic!("expected RegionTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn aatsr_region_from_swath_scan() {
        let p = aatsr_product();
        let params = SubsetParams::new("h18v04").with_instrument("AATSR");
        let r = tile_region(&p, &fixture(), &params).unwrap();
        assert_eq!(r, PixelRegion::new(0, 500, 512, 501));
    }

    #[test]
    fn aatsr_without_overlap_is_rejected() {
        let p = aatsr_product();
        // the tile north of h18v04 gets the rows above it
        let params = SubsetParams::new("h18v03").with_instrument("AATSR");
        let r = tile_region(&p, &fixture(), &params).unwrap();
        assert_eq!(r, PixelRegion::new(0, 0, 512, 501));

        // 5E is west of h19v04
        let params = SubsetParams::new("h19v04").with_instrument("AATSR");
        let err = tile_region(&p, &fixture(), &params).unwrap_err();
        assert!(matches!(err, Error::RegionTooSmall(_)));
    }

    #[test]
    fn aatsr_missing_grid_fails() {
        let p = MemProduct::new("p", (10, 10));
        let params = SubsetParams::new("h18v04").with_instrument("AATSR");
        let err = tile_region(&p, &fixture(), &params).unwrap_err();
        assert!(matches!(err, Error::MissingTiePointGrid(ref n) if n == "latitude"));
    }

    #[test]
    fn parameter_errors() {
        let p = aatsr_product();
        let err = tile_region(&p, &fixture(), &SubsetParams::new("h99v99")).unwrap_err();
        assert!(matches!(err, Error::TileNotFound(ref n) if n == "h99v99"));

        let params = SubsetParams::new("h18v04").with_instrument("MERIS");
        let err = tile_region(&p, &fixture(), &params).unwrap_err();
        assert!(matches!(err, Error::UnknownInstrument(_)));
    }

    #[test]
    fn min_size_boundaries() {
        assert!(check_min_size(Some(PixelRegion::new(0, 0, 200, 200)), 200).is_ok());
        assert!(check_min_size(Some(PixelRegion::new(0, 0, 199, 500)), 200).is_err());
        assert!(check_min_size(Some(PixelRegion::new(0, 0, 500, 199)), 200).is_err());
        assert!(check_min_size(None, 0).is_err());
    }

    #[test]
    fn subset_copies_tile_region() {
        let p = vgt_product(Array2::from_elem((700, 900), 1.));
        let out = subset(&p, &fixture(), &SubsetParams::new("h18v04"), &MemoryExtractor).unwrap();
        assert_eq!(out.raster_size(), (498, 320));
        assert_eq!(out.band_names(), vec!["SM", "B0"]);
        assert_eq!(out.metadata_names(), vec!["Processing_Graph"]);

        let pos = out
            .geocoding()
            .unwrap()
            .geo_pos(geo::Coord { x: 0., y: 0. })
            .unwrap();
        assert!(pos.lon.abs() < 1e-9);
        assert!((pos.lat - 50.).abs() < 1e-9);
    }
}
