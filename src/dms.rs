//! Degree-minute-second coordinates as found in the tile
//! catalog, e.g. `15d33'26.06"E`.

use crate::{Error, Result};

const DELIMITERS: &[char] = &['d', '\'', '"'];

/// Parse a DMS string with a trailing hemisphere letter
/// into signed decimal degrees.
///
/// The string must split into exactly four tokens on `d`,
/// `'` and `"`: degrees, minutes, seconds and hemisphere.
/// Trailing empty tokens don't count, so `10d30'15"` (no
/// hemisphere) is rejected. The value is positive for `N`
/// and `E` and negative for any other hemisphere token.
pub fn parse_dms(dms: &str) -> Result<f64> {
    let mut tokens: Vec<&str> = dms.split(DELIMITERS).collect();
    while tokens.last().map_or(false, |t| t.is_empty()) {
        tokens.pop();
    }
    if tokens.len() != 4 {
        return Err(Error::parse(
            dms,
            format!("expected 4 tokens, found {}", tokens.len()),
        ));
    }

    let number = |tok: &str| -> Result<f64> {
        tok.trim()
            .parse::<f64>()
            .map_err(|e| Error::parse(dms, format!("`{}`: {}", tok, e)))
    };
    let d = number(tokens[0])?;
    let m = number(tokens[1])?;
    let s = number(tokens[2])?;

    let sign = match tokens[3] {
        "N" | "E" => 1.,
        _ => -1.,
    };
    Ok(sign * (d + m / 60. + s / 3600.))
}

/// Format decimal degrees in the catalog's DMS notation,
/// using `positive` or `negative` as hemisphere letter.
pub fn format_dms(value: f64, positive: char, negative: char) -> String {
    let hemisphere = if value < 0. { negative } else { positive };
    let total = (value.abs() * 360_000.).round() as u64;
    let degrees = total / 360_000;
    let minutes = total % 360_000 / 6_000;
    let hundredths = total % 6_000;
    format!(
        "{}d{:02}'{:02}.{:02}\"{}",
        degrees,
        minutes,
        hundredths / 100,
        hundredths % 100,
        hemisphere
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn parses_positive_hemispheres() {
        assert!((parse_dms("10d30'15\"N").unwrap() - (10. + 30. / 60. + 15. / 3600.)).abs() < EPS);
        assert!((parse_dms("0d00'00.00\"E").unwrap()).abs() < EPS);
        assert!((parse_dms("20d00'00.00\"E").unwrap() - 20.).abs() < EPS);
    }

    #[test]
    fn parses_negative_hemispheres() {
        assert!((parse_dms("10d30'15\"S").unwrap() + 10.504166666666666).abs() < EPS);
        assert!((parse_dms("15d33'26.06\"W").unwrap() + (15. + 33. / 60. + 26.06 / 3600.)).abs() < EPS);
    }

    #[test]
    fn parses_fractional_minutes_and_seconds() {
        let v = parse_dms("45d7.5'30.25\"N").unwrap();
        assert!((v - (45. + 7.5 / 60. + 30.25 / 3600.)).abs() < EPS);
    }

    #[test]
    fn unknown_hemisphere_is_negative() {
        assert!((parse_dms("1d0'0\"X").unwrap() + 1.).abs() < EPS);
        assert!((parse_dms("1d0'0\"NE").unwrap() + 1.).abs() < EPS);
    }

    #[test]
    fn synthetic_values_match_closed_form() {
        for &d in &[0., 1., 45., 89., 179.] {
            for &m in &[0., 1.5, 30., 59.] {
                for &s in &[0., 0.25, 12.75, 59.5] {
                    let expected = d + m / 60. + s / 3600.;
                    for &(hemi, sign) in &[('N', 1.), ('E', 1.), ('S', -1.), ('W', -1.)] {
                        let text = format!("{}d{}'{}\"{}", d, m, s, hemi);
                        let v = parse_dms(&text).unwrap();
                        assert!((v - sign * expected).abs() < EPS, "{}", text);
                    }
                }
            }
        }
    }

    #[test]
    fn rejects_wrong_token_count() {
        for bad in &["10d30'15\"", "10d30'N", "10d30'15\"N\"extra", "", "10.5"] {
            match parse_dms(bad) {
                Err(Error::Parse { .. }) => {}
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert!(matches!(parse_dms("ad30'15\"N"), Err(Error::Parse { .. })));
    }

    #[test]
    fn formatted_values_parse_back() {
        let text = format_dms(-13.054072, 'E', 'W');
        assert_eq!(text, "13d03'14.66\"W");
        assert!((parse_dms(&text).unwrap() + 13.054072).abs() < 1e-5);
        assert_eq!(format_dms(50., 'N', 'S'), "50d00'00.00\"N");
    }
}
