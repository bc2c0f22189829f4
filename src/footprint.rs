//! Projection of a tile outline into source pixel space.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString, Polygon};

use crate::geocoding::{GeoCoding, GeoPos};
use crate::tile::Tile;
use crate::{Error, Result};

/// Pixel positions of the tile corners, in
/// [`CornerId::ALL`](crate::tile::CornerId::ALL) order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub corners: [Coord<f64>; 4],
}

/// Project the corners of `tile` into pixel space.
pub fn project_footprint<G: GeoCoding + ?Sized>(tile: &Tile, geocoding: &G) -> Result<Footprint> {
    let mut corners = [Coord { x: 0., y: 0. }; 4];
    for (slot, (_, corner)) in corners.iter_mut().zip(tile.corners()) {
        let pos = GeoPos::new(corner.lat_deg()?, corner.lon_deg()?);
        *slot = geocoding.pixel_pos(pos)?;
    }
    Ok(Footprint { corners })
}

impl Footprint {
    pub fn new(corners: [Coord<f64>; 4]) -> Self {
        Footprint { corners }
    }

    /// Closed polygon through the corners.
    pub fn polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.corners.to_vec()), vec![])
    }

    /// Edge `i` runs from corner `i` to corner `i + 1`
    /// (wrapping).
    fn edge(&self, i: usize) -> Line<f64> {
        Line::new(self.corners[i], self.corners[(i + 1) % 4])
    }

    /// Check that every corner is finite and that the
    /// quadrilateral does not intersect itself. Only the two
    /// pairs of opposite edges can cross.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self.corners.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(Error::InvalidFootprint(format!(
                "corner ({}, {}) is not finite",
                c.x, c.y
            )));
        }
        for &(a, b) in &[(0, 2), (1, 3)] {
            let (ea, eb) = (self.edge(a), self.edge(b));
            let crossing = match line_intersection(ea, eb) {
                None => false,
                Some(LineIntersection::Collinear { .. }) => true,
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    let shared = |l: &Line<f64>| intersection == l.start || intersection == l.end;
                    !(shared(&ea) && shared(&eb))
                }
            };
            if crossing {
                return Err(Error::InvalidFootprint(format!(
                    "edges {} and {} intersect",
                    a, b
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::AffineGeoCoding;
    use crate::tile::tests::h18v04;

    fn quad(pts: [(f64, f64); 4]) -> Footprint {
        let mut corners = [Coord { x: 0., y: 0. }; 4];
        for (c, &(x, y)) in corners.iter_mut().zip(pts.iter()) {
            *c = Coord { x, y };
        }
        Footprint::new(corners)
    }

    #[test]
    fn projects_corners_in_boundary_order() {
        // 0.01 degree pixels, origin at 10W 60N
        let gc = AffineGeoCoding::plate_carree(-10., 60., 0.01).unwrap();
        let fp = project_footprint(&h18v04(), &gc).unwrap();

        let expected = [
            (1000., 1000.),
            (1000. + 1555.72389, 1000.),
            (1000. + 1305.40722, 2000.),
            (1000., 2000.),
        ];
        for (c, &(x, y)) in fp.corners.iter().zip(expected.iter()) {
            assert!((c.x - x).abs() < 1e-3, "{:?} vs {:?}", c, (x, y));
            assert!((c.y - y).abs() < 1e-6, "{:?} vs {:?}", c, (x, y));
        }
        fp.validate().unwrap();
    }

    #[test]
    fn parse_errors_propagate() {
        use crate::tile::{CornerId, GeoCorner, Tile};

        let gc = AffineGeoCoding::plate_carree(0., 0., 1.).unwrap();
        let base = h18v04();
        let tile = Tile::new(
            "broken",
            "18",
            "4",
            [
                base.corner(CornerId::UpperLeft).clone(),
                GeoCorner::new("bad", "50d00'00.00\"N"),
                base.corner(CornerId::LowerRight).clone(),
                base.corner(CornerId::LowerLeft).clone(),
            ],
        );
        assert!(matches!(
            project_footprint(&tile, &gc),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn accepts_simple_quadrilaterals() {
        quad([(0., 0.), (10., 0.), (10., 10.), (0., 10.)]).validate().unwrap();
        quad([(0., 0.), (0., 10.), (10., 10.), (10., 0.)]).validate().unwrap();
        quad([(0., 0.), (10., 2.), (8., 9.), (1., 7.)]).validate().unwrap();
    }

    #[test]
    fn rejects_bow_tie() {
        let err = quad([(0., 0.), (10., 10.), (10., 0.), (0., 10.)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFootprint(_)));
    }

    #[test]
    fn rejects_non_finite_corner() {
        assert!(quad([(0., 0.), (f64::NAN, 0.), (10., 10.), (0., 10.)])
            .validate()
            .is_err());
    }
}
