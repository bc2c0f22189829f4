//! MODIS grid tiles described by their four geodetic
//! corners.

use serde_derive::Serialize;

use crate::dms::parse_dms;
use crate::Result;

/// Corners of a tile. Iteration order (see [`CornerId::ALL`])
/// walks the tile boundary and defines the winding of the
/// projected footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CornerId {
    UpperLeft,
    UpperRight,
    LowerRight,
    LowerLeft,
}

impl CornerId {
    pub const ALL: [CornerId; 4] = [
        CornerId::UpperLeft,
        CornerId::UpperRight,
        CornerId::LowerRight,
        CornerId::LowerLeft,
    ];

    /// Element name used in the catalog document.
    pub fn name(self) -> &'static str {
        match self {
            CornerId::UpperLeft => "UpperLeft",
            CornerId::UpperRight => "UpperRight",
            CornerId::LowerRight => "LowerRight",
            CornerId::LowerLeft => "LowerLeft",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Raw corner coordinates in DMS notation. Parsed on
/// demand; callers that need the values repeatedly should
/// keep the parsed numbers themselves.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeoCorner {
    pub lon: String,
    pub lat: String,
}

impl GeoCorner {
    pub fn new(lon: impl Into<String>, lat: impl Into<String>) -> Self {
        GeoCorner {
            lon: lon.into(),
            lat: lat.into(),
        }
    }

    pub fn lat_deg(&self) -> Result<f64> {
        parse_dms(&self.lat)
    }

    pub fn lon_deg(&self) -> Result<f64> {
        parse_dms(&self.lon)
    }
}

/// Geographic extent of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatLonBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonBounds {
    /// Open-interval membership test on latitude.
    #[inline]
    pub fn contains_lat(&self, lat: f64) -> bool {
        lat > self.lat_min && lat < self.lat_max
    }

    /// Open-interval membership test on longitude.
    #[inline]
    pub fn contains_lon(&self, lon: f64) -> bool {
        lon > self.lon_min && lon < self.lon_max
    }
}

/// A named grid tile. `easting` and `northing` are the grid
/// indices as written in the catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tile {
    pub name: String,
    pub easting: String,
    pub northing: String,
    corners: [GeoCorner; 4],
}

impl Tile {
    /// Construct from corners given in [`CornerId::ALL`]
    /// order.
    pub fn new(
        name: impl Into<String>,
        easting: impl Into<String>,
        northing: impl Into<String>,
        corners: [GeoCorner; 4],
    ) -> Self {
        Tile {
            name: name.into(),
            easting: easting.into(),
            northing: northing.into(),
            corners,
        }
    }

    pub fn corner(&self, id: CornerId) -> &GeoCorner {
        &self.corners[id.index()]
    }

    /// Corners in boundary order.
    pub fn corners(&self) -> impl Iterator<Item = (CornerId, &GeoCorner)> {
        (0..4).map(move |i| (CornerId::ALL[i], &self.corners[i]))
    }

    pub fn min_lat(&self) -> Result<f64> {
        self.fold_corners(GeoCorner::lat_deg, f64::INFINITY, f64::min)
    }

    pub fn max_lat(&self) -> Result<f64> {
        self.fold_corners(GeoCorner::lat_deg, f64::NEG_INFINITY, f64::max)
    }

    pub fn min_lon(&self) -> Result<f64> {
        self.fold_corners(GeoCorner::lon_deg, f64::INFINITY, f64::min)
    }

    pub fn max_lon(&self) -> Result<f64> {
        self.fold_corners(GeoCorner::lon_deg, f64::NEG_INFINITY, f64::max)
    }

    pub fn lat_lon_bounds(&self) -> Result<LatLonBounds> {
        Ok(LatLonBounds {
            lat_min: self.min_lat()?,
            lat_max: self.max_lat()?,
            lon_min: self.min_lon()?,
            lon_max: self.max_lon()?,
        })
    }

    fn fold_corners(
        &self,
        coord: fn(&GeoCorner) -> Result<f64>,
        init: f64,
        f: fn(f64, f64) -> f64,
    ) -> Result<f64> {
        self.corners
            .iter()
            .try_fold(init, |acc, c| Ok(f(acc, coord(c)?)))
    }
}
