//! `[SRID=<id>;]BBOX[ Z| ZM| <n>](<mins> <maxs>)` and `BBOX EMPTY` text. `<n>` is an axis count from 2 to 4.
//! A lone `M` tag is rejected, three axes are always X, Y and Z.

use std::sync::Arc;

use crate::bounding_box::BoundingBox;
use crate::error::MeridianError;
use crate::geometry::GeometryFactory;

/// BBOX text split into its parts, before the srid is resolved into a factory.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedBoundingBox {
    pub srid: i32,
    pub axis_count: usize,
    // All minimums followed by all maximums, `None` for an empty box.
    bounds: Option<Vec<f64>>,
}

impl ParsedBoundingBox {
    pub fn into_bounding_box(self, factory: Arc<GeometryFactory>) -> BoundingBox {
        match self.bounds {
            Some(bounds) => BoundingBox::from_bounds(factory, self.axis_count, bounds),
            None => BoundingBox::empty(factory),
        }
    }
}

const MIN_AXIS_COUNT: usize = 2;
const MAX_AXIS_COUNT: usize = 4;

fn error(message: impl Into<String>) -> MeridianError {
    MeridianError::BoundingBoxParse(message.into())
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Parses BBOX text. Blank text is an empty 2d box without srid.
pub(crate) fn parse(text: &str) -> Result<ParsedBoundingBox, MeridianError> {
    let mut rest = text.trim();
    let mut parsed = ParsedBoundingBox {
        srid: 0,
        axis_count: 2,
        bounds: None,
    };

    if rest.is_empty() {
        return Ok(parsed);
    }

    if let Some(after) = strip_prefix_ignore_case(rest, "SRID=") {
        let (srid, after) = after
            .split_once(';')
            .ok_or_else(|| error("expected ';' after the srid"))?;
        parsed.srid = srid
            .trim()
            .parse()
            .map_err(|_| error(format!("invalid srid '{srid}'")))?;
        rest = after.trim_start();
    }

    let rest = strip_prefix_ignore_case(rest, "BBOX")
        .ok_or_else(|| error(format!("expected 'BBOX' at '{rest}'")))?
        .trim_start();

    if rest.eq_ignore_ascii_case("EMPTY") {
        return Ok(parsed);
    }

    let (tag, body) = rest
        .split_once('(')
        .ok_or_else(|| error("expected '('"))?;
    let body = body
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| error("expected ')' at the end"))?;

    let values = body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| error(format!("invalid number '{s}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tag = tag.trim();
    let axis_count = if tag.is_empty() {
        values.len() / 2
    } else if tag.eq_ignore_ascii_case("Z") {
        3
    } else if tag.eq_ignore_ascii_case("ZM") {
        4
    } else {
        match tag.parse::<usize>() {
            Ok(count) if (MIN_AXIS_COUNT..=MAX_AXIS_COUNT).contains(&count) => count,
            _ => return Err(error(format!("invalid axis tag '{tag}'"))),
        }
    };

    if !(MIN_AXIS_COUNT..=MAX_AXIS_COUNT).contains(&axis_count) || values.len() != axis_count * 2 {
        return Err(error(format!(
            "expected {} ordinates, found {}",
            axis_count.clamp(MIN_AXIS_COUNT, MAX_AXIS_COUNT) * 2,
            values.len()
        )));
    }

    parsed.axis_count = axis_count;
    parsed.bounds = Some(values);
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn plain_box() {
        let parsed = parse("BBOX(-10,-10 10,10)").unwrap();
        assert_eq!(parsed.srid, 0);
        assert_eq!(parsed.axis_count, 2);
        assert_eq!(parsed.bounds, Some(vec![-10.0, -10.0, 10.0, 10.0]));
    }

    #[test]
    fn srid_and_axes() {
        let parsed = parse(" SRID=3857; BBOX ZM(1, 2,3,4 5,6, 7,8e1) ").unwrap();
        assert_eq!(parsed.srid, 3857);
        assert_eq!(parsed.axis_count, 4);
        assert_eq!(parsed.bounds, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 80.0]));
    }

    #[test]
    fn empty_boxes() {
        assert_eq!(parse("").unwrap().bounds, None);
        assert_eq!(parse("   ").unwrap().bounds, None);

        let parsed = parse("SRID=4326;BBOX EMPTY").unwrap();
        assert_eq!(parsed.srid, 4326);
        assert_eq!(parsed.bounds, None);
    }

    #[test]
    fn malformed() {
        assert_matches!(parse("BOX(0,0 1,1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("BBOX(0,0 1,1"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("BBOX(0,0 1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("BBOX Z(0,0 1,1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("BBOX(0,a 1,1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("SRID=x;BBOX EMPTY"), Err(MeridianError::BoundingBoxParse(_)));
    }

    #[test]
    fn axis_count_tag_is_limited() {
        assert_eq!(parse("BBOX 3(0,0,0 1,1,1)").unwrap().axis_count, 3);
        assert_matches!(parse("BBOX 1(0 1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(parse("BBOX 5(0,0,0,0,0 1,1,1,1,1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_matches!(
            parse("BBOX 18446744073709551615(0,0 1,1)"),
            Err(MeridianError::BoundingBoxParse(_))
        );
        assert_matches!(parse("BBOX(0,0,0,0,0 1,1,1,1,1)"), Err(MeridianError::BoundingBoxParse(_)));
    }

    #[test]
    fn measure_tag_is_rejected() {
        assert_matches!(parse("BBOX M(0,0,0 1,1,1)"), Err(MeridianError::BoundingBoxParse(_)));
        assert_eq!(parse("BBOX Z(0,0,0 1,1,1)").unwrap().axis_count, 3);
    }
}
