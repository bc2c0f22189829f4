//! The tile catalog: an XML document listing the grid
//! tiles that products can be subset to.
//!
//! ```xml
//! <TileCoordinates>
//!   <tile name="h18v04">
//!     <Easting>18</Easting>
//!     <Northing>4</Northing>
//!     <UpperLeft><lon>0d00'00.00"E</lon><lat>50d00'00.00"N</lat></UpperLeft>
//!     <UpperRight>...</UpperRight>
//!     <LowerRight>...</LowerRight>
//!     <LowerLeft>...</LowerLeft>
//!   </tile>
//! </TileCoordinates>
//! ```
//!
//! The catalog is read-only once loaded. Callers own it and
//! pass it by reference to whatever needs a lookup.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde_derive::Deserialize;
use tracing::debug;

use crate::tile::{GeoCorner, Tile};
use crate::{Error, Result};

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(rename = "tile", default)]
    tiles: Vec<TileRecord>,
}

#[derive(Deserialize)]
struct TileRecord {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "Easting")]
    easting: String,
    #[serde(rename = "Northing")]
    northing: String,
    #[serde(rename = "UpperLeft")]
    upper_left: CornerRecord,
    #[serde(rename = "UpperRight")]
    upper_right: CornerRecord,
    #[serde(rename = "LowerRight")]
    lower_right: CornerRecord,
    #[serde(rename = "LowerLeft")]
    lower_left: CornerRecord,
}

#[derive(Deserialize)]
struct CornerRecord {
    lon: String,
    lat: String,
}

impl From<CornerRecord> for GeoCorner {
    fn from(c: CornerRecord) -> Self {
        GeoCorner::new(c.lon.trim(), c.lat.trim())
    }
}

impl From<TileRecord> for Tile {
    fn from(r: TileRecord) -> Self {
        Tile::new(
            r.name,
            r.easting.trim(),
            r.northing.trim(),
            [
                r.upper_left.into(),
                r.upper_right.into(),
                r.lower_right.into(),
                r.lower_left.into(),
            ],
        )
    }
}

/// Ordered collection of tiles, in document order.
#[derive(Clone, Debug, Default)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
}

impl TileCatalog {
    pub fn new(tiles: Vec<Tile>) -> Self {
        TileCatalog { tiles }
    }

    /// Load the catalog document at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::catalog(path.display().to_string(), e))?;
        Self::read(BufReader::new(file), &path.display().to_string())
    }

    /// Parse a catalog from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::read(reader, "reader")
    }

    fn read<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let doc: CatalogDocument =
            quick_xml::de::from_reader(reader).map_err(|e| Error::catalog(source_name, e))?;
        let catalog = Self::from_document(doc);
        debug!(source = source_name, tiles = catalog.len(), "loaded tile catalog");
        Ok(catalog)
    }

    fn from_document(doc: CatalogDocument) -> Self {
        TileCatalog {
            tiles: doc.tiles.into_iter().map(Tile::from).collect(),
        }
    }

    /// Look up a tile by exact (case-sensitive) name.
    pub fn find(&self, name: &str) -> Result<&Tile> {
        self.tiles
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::TileNotFound(name.to_string()))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Parse a catalog held in memory.
impl FromStr for TileCatalog {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        let doc: CatalogDocument =
            quick_xml::de::from_str(xml).map_err(|e| Error::catalog("string", e))?;
        Ok(Self::from_document(doc))
    }
}

impl<'a> IntoIterator for &'a TileCatalog {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tile::CornerId;

    pub(crate) const FIXTURE: &str = include_str!("../tests/fixtures/tiles.xml");

    pub(crate) fn fixture() -> TileCatalog {
        FIXTURE.parse().unwrap()
    }

    #[test]
    fn loads_fixture_in_document_order() {
        let catalog = fixture();
        let names: Vec<_> = catalog.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["h17v04", "h18v03", "h18v04", "h19v04", "h18v05"]);
    }

    #[test]
    fn find_returns_exact_tile() {
        let catalog = fixture();
        let tile = catalog.find("h18v04").unwrap();
        assert_eq!(tile, &crate::tile::tests::h18v04());
        assert_eq!(tile.easting, "18");
        assert_eq!(tile.northing, "4");
        assert_eq!(tile.corner(CornerId::UpperRight).lon, "15d33'26.06\"E");
    }

    #[test]
    fn find_is_case_sensitive() {
        let catalog = fixture();
        for name in &["H18V04", "h18v4", "h99v99", ""] {
            match catalog.find(name) {
                Err(Error::TileNotFound(n)) => assert_eq!(&n, name),
                other => panic!("{} gave {:?}", name, other),
            }
        }
    }

    #[test]
    fn missing_field_fails() {
        let xml = r#"<TileCoordinates>
            <tile name="h00v00">
              <Easting>0</Easting>
              <UpperLeft><lon>0d0'0"E</lon><lat>0d0'0"N</lat></UpperLeft>
              <UpperRight><lon>0d0'0"E</lon><lat>0d0'0"N</lat></UpperRight>
              <LowerRight><lon>0d0'0"E</lon><lat>0d0'0"N</lat></LowerRight>
              <LowerLeft><lon>0d0'0"E</lon><lat>0d0'0"N</lat></LowerLeft>
            </tile>
          </TileCoordinates>"#;
        assert!(matches!(
            xml.parse::<TileCatalog>(),
            Err(Error::CatalogLoad { .. })
        ));
    }

    #[test]
    fn malformed_document_fails() {
        assert!(matches!(
            "<TileCoordinates><tile name=\"x\">".parse::<TileCatalog>(),
            Err(Error::CatalogLoad { .. })
        ));
    }

    #[test]
    fn loads_from_path() {
        use tempdir::TempDir;
        let dir = TempDir::new("tile_catalog").unwrap();
        let path = dir.path().join("tiles.xml");
        std::fs::write(&path, FIXTURE).unwrap();

        let catalog = TileCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 5);

        match TileCatalog::load(dir.path().join("missing.xml")) {
            Err(e @ Error::CatalogLoad { .. }) => assert_eq!(e.stage(), "catalog load"),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn from_reader_matches_parse() {
        let catalog = TileCatalog::from_reader(FIXTURE.as_bytes()).unwrap();
        assert_eq!(catalog.tiles(), fixture().tiles());
    }
}
