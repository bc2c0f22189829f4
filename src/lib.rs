//! Subset satellite products to MODIS sinusoidal grid tiles.
//!
//! A tile is looked up by name in a [`TileCatalog`], its
//! corner coordinates are parsed from degree-minute-second
//! text and the pixel region of the product covered by the
//! tile is computed. Map-projected (VGT) products are
//! handled by projecting the tile footprint into pixel
//! space, clipping it against the raster and trimming to
//! valid data; swath (AATSR) products by scanning the
//! geolocation tie-point grids. Regions smaller than
//! [`config::MIN_REGION_SIZE`] are rejected.
//!
//! Raster access is abstracted by the [`Product`] trait.
//! An in-memory implementation is in [`memory`]; enable the
//! `gdal` feature for a GDAL-backed one.

pub mod catalog;
pub mod config;
pub mod dms;
pub mod error;
pub mod footprint;
pub mod geocoding;
pub mod geometry;
pub mod memory;
pub mod overlap;
pub mod product;
pub mod subset;
pub mod swath;
pub mod tile;
pub mod trim;

#[cfg(feature = "gdal")]
pub mod reader;

pub mod prelude;

pub use catalog::TileCatalog;
pub use error::{Error, Result};
pub use product::{Product, SubsetDef, SubsetExtractor};
pub use subset::{subset, tile_region};
