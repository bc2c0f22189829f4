//! Shrink a candidate region to the rows and columns that
//! hold valid pixel data.

use tracing::debug;

use crate::geometry::PixelRegion;
use crate::product::{BandInfo, Product};
use crate::{Error, Result};

/// Index of the first band with a non-zero spectral
/// wavelength.
pub fn representative_band(bands: &[BandInfo]) -> Result<usize> {
    bands
        .iter()
        .position(BandInfo::is_spectral)
        .ok_or(Error::NoSpectralBand)
}

/// Trim `region` to the first and last columns and rows that
/// contain a valid pixel.
///
/// Columns are searched from both ends at once: `i1` moves
/// right and `i2` moves left until each sits on a column with
/// at least one valid pixel in the rows of `region`. Rows are
/// searched the same way over the columns of the original
/// `region`. If there is no valid pixel the pointers cross
/// and the returned region is empty.
pub fn trim_region<F>(region: PixelRegion, is_valid: F) -> PixelRegion
where
    F: Fn(isize, isize) -> bool,
{
    let (x0, x1) = (region.x, region.right());
    let (y0, y1) = (region.y, region.bottom());

    let (i1, i2) = closing_in(x0, x1, |i| (y0..y1).any(|j| is_valid(i, j)));
    let (j1, j2) = closing_in(y0, y1, |j| (x0..x1).any(|i| is_valid(i, j)));

    PixelRegion::new(i1, j1, i2 - i1 + 1, j2 - j1 + 1)
}

/// Move a start and an end pointer over `[lo, hi)` towards
/// each other until both `has_data`. Each pointer only moves
/// while its own line is empty.
fn closing_in<F>(lo: isize, hi: isize, has_data: F) -> (isize, isize)
where
    F: Fn(isize) -> bool,
{
    let mut start = lo;
    let mut end = hi - 1;
    while start < hi && end >= lo {
        let start_found = has_data(start);
        let end_found = has_data(end);
        if start_found && end_found {
            break;
        }
        if !start_found {
            start += 1;
        }
        if !end_found {
            end -= 1;
        }
    }
    (start, end)
}

/// Trim `region` using the validity of the representative
/// band of `product`.
pub fn trim_to_valid_pixels<P: Product + ?Sized>(
    product: &P,
    region: PixelRegion,
) -> Result<PixelRegion> {
    let band = representative_band(product.bands())?;
    if region.is_empty() {
        return Ok(region);
    }
    let mask = product.valid_mask(band, region)?;
    let trimmed = trim_region(region, |x, y| mask.is_valid(x, y));
    debug!(
        band = %product.bands()[band].name,
        ?region,
        ?trimmed,
        "trimmed region to valid pixels"
    );
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(r: PixelRegion) -> impl Fn(isize, isize) -> bool {
        move |x, y| r.contains(x, y)
    }

    #[test]
    fn trims_to_valid_block() {
        let valid = PixelRegion::new(10, 10, 50, 50);
        let out = trim_region(PixelRegion::new(0, 0, 100, 100), inside(valid));
        assert_eq!(out, valid);
    }

    #[test]
    fn fully_valid_region_is_unchanged() {
        let r = PixelRegion::new(3, 7, 40, 20);
        assert_eq!(trim_region(r, |_, _| true), r);
    }

    #[test]
    fn no_valid_pixel_gives_empty_region() {
        let out = trim_region(PixelRegion::new(5, 5, 30, 20), |_, _| false);
        assert!(out.is_empty());
    }

    #[test]
    fn single_valid_pixel() {
        let out = trim_region(PixelRegion::new(0, 0, 10, 10), |x, y| x == 4 && y == 7);
        assert_eq!(out, PixelRegion::new(4, 7, 1, 1));
    }

    #[test]
    fn row_search_uses_original_columns() {
        // Two separated blobs: the bounding box spans both
        let valid = |x: isize, y: isize| {
            ((2..5).contains(&x) && (20..30).contains(&y))
                || ((50..60).contains(&x) && (3..8).contains(&y))
        };
        let out = trim_region(PixelRegion::new(0, 0, 100, 40), valid);
        assert_eq!(out, PixelRegion::new(2, 3, 58, 27));
    }

    #[test]
    fn offset_region_is_respected() {
        // Valid data outside the candidate region is ignored
        let out = trim_region(PixelRegion::new(50, 50, 20, 20), |x, y| x < 55 || y >= 66);
        assert_eq!(out, PixelRegion::new(50, 50, 20, 20));

        let out = trim_region(PixelRegion::new(50, 50, 20, 20), |x, y| x >= 60 && y >= 66);
        assert_eq!(out, PixelRegion::new(60, 66, 10, 4));
    }

    #[test]
    fn representative_band_is_first_spectral() {
        let bands = vec![
            BandInfo::new("SM", 0.),
            BandInfo::new("B0", 450.),
            BandInfo::new("B2", 645.),
        ];
        assert_eq!(representative_band(&bands).unwrap(), 1);
        assert!(matches!(
            representative_band(&bands[..1]),
            Err(Error::NoSpectralBand)
        ));
        assert!(matches!(representative_band(&[]), Err(Error::NoSpectralBand)));
    }
}
