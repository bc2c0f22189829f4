//! Operating parameters of the subsetter.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smallest accepted width and height of a tile region, in
/// pixels.
pub const MIN_REGION_SIZE: usize = 200;

/// Source product family; selects how the overlap is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Instrument {
    /// Plate-carrée products: footprint clipping and trimming.
    Vgt,
    /// Swath products: tie-point scan.
    Aatsr,
}

impl Instrument {
    pub fn as_str(self) -> &'static str {
        match self {
            Instrument::Vgt => "VGT",
            Instrument::Aatsr => "AATSR",
        }
    }
}

impl FromStr for Instrument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "VGT" => Ok(Instrument::Vgt),
            "AATSR" => Ok(Instrument::Aatsr),
            _ => Err(Error::UnknownInstrument(s.to_string())),
        }
    }
}

/// Tuning of the swath scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwathConfig {
    /// Only every `row_step`-th row is sampled.
    pub row_step: usize,
    /// Rows whose viewing condition at the first column is
    /// not above this value are skipped. With the default
    /// grid this is the sun elevation in degrees, keeping the
    /// day-time (descending) part of the orbit.
    pub min_view_condition: f32,
    pub latitude_grid: String,
    pub longitude_grid: String,
    pub view_condition_grid: String,
}

impl Default for SwathConfig {
    fn default() -> Self {
        SwathConfig {
            row_step: 10,
            min_view_condition: 30.,
            latitude_grid: "latitude".into(),
            longitude_grid: "longitude".into(),
            view_condition_grid: "sun_elev_nadir".into(),
        }
    }
}

fn default_instrument() -> String {
    Instrument::Vgt.as_str().to_string()
}

fn default_min_region_size() -> usize {
    MIN_REGION_SIZE
}

/// Parameters of one subsetting run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsetParams {
    pub tile_name: String,
    /// `VGT` or `AATSR`. Kept as text so that an unknown value
    /// is reported by [`SubsetParams::instrument`].
    #[serde(default = "default_instrument")]
    pub instrument: String,
    #[serde(default = "default_min_region_size")]
    pub min_region_size: usize,
    #[serde(default)]
    pub swath: SwathConfig,
}

impl SubsetParams {
    pub fn new(tile_name: impl Into<String>) -> Self {
        SubsetParams {
            tile_name: tile_name.into(),
            instrument: default_instrument(),
            min_region_size: MIN_REGION_SIZE,
            swath: SwathConfig::default(),
        }
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = instrument.into();
        self
    }

    /// Read parameters from a JSON document.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))
    }

    pub fn instrument(&self) -> Result<Instrument> {
        self.instrument.parse()
    }

    /// Reject parameters that cannot drive a run.
    pub fn validate(&self) -> Result<Instrument> {
        if self.tile_name.is_empty() {
            return Err(Error::Config("tile name is empty".into()));
        }
        if self.swath.row_step == 0 {
            return Err(Error::Config("swath row step must be positive".into()));
        }
        self.instrument()
    }
}
