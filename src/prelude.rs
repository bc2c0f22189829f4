pub use crate::{Error, Result};

pub use crate::catalog::*;
pub use crate::config::*;
pub use crate::dms::*;
pub use crate::footprint::*;
pub use crate::geocoding::*;
pub use crate::geometry::*;
pub use crate::product::*;
pub use crate::subset::*;
pub use crate::tile::*;

#[cfg(feature = "gdal")]
pub use crate::reader::*;
