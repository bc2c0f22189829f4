//! Error type shared by every stage of the tile subsetting.

use thiserror::Error;

/// Failures of a tile-subset computation. None of these
/// are transient: each aborts the whole operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't parse coordinate `{input}`: {reason}")]
    Parse { input: String, reason: String },

    #[error("couldn't load tile catalog from {source_name}: {reason}")]
    CatalogLoad { source_name: String, reason: String },

    #[error("tile `{0}` not in catalog")]
    TileNotFound(String),

    #[error("unknown instrument `{0}` (expected VGT or AATSR)")]
    UnknownInstrument(String),

    #[error("product has no geocoding")]
    MissingGeoCoding,

    #[error("geocoding failed at lat {lat}, lon {lon}: {reason}")]
    GeoCoding { lat: f64, lon: f64, reason: String },

    #[error("tile footprint is not a simple quadrilateral: {0}")]
    InvalidFootprint(String),

    #[error("product does not contain spectral bands")]
    NoSpectralBand,

    #[error("tie-point grid `{0}` not found in product")]
    MissingTiePointGrid(String),

    #[error("region too small: {0}")]
    RegionTooSmall(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[cfg(feature = "gdal")]
    #[error(transparent)]
    Gdal(#[from] gdal::errors::GdalError),
}

impl Error {
    /// Name of the processing stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Parse { .. } => "parse input",
            Error::CatalogLoad { .. } => "catalog load",
            Error::TileNotFound(_) => "catalog lookup",
            Error::UnknownInstrument(_) | Error::Config(_) => "parameters",
            Error::MissingGeoCoding | Error::GeoCoding { .. } | Error::InvalidFootprint(_) => {
                "footprint projection"
            }
            Error::NoSpectralBand => "trimming",
            Error::MissingTiePointGrid(_) => "swath scan",
            Error::RegionTooSmall(_) => "minimum-size check",
            Error::Io(_) | Error::Shape(_) => "product access",
            #[cfg(feature = "gdal")]
            Error::Gdal(_) => "product access",
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn catalog(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Error::CatalogLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
