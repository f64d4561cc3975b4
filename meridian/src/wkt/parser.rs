use crate::cs::{
    AngularUnit, Authority, Axis, CoordinateSystem, Datum, GeographicCoordinateSystem, LinearUnit, PrimeMeridian,
    ProjectedCoordinateSystem, Projection, ProjectionParameters, Spheroid, ToWgs84,
};
use crate::error::MeridianError;
use crate::wkt::WktValue;

// Deepest node nesting accepted. Real definitions nest a few levels.
const MAX_DEPTH: usize = 64;

/// Parses WKT text into a single value.
///
/// Known nodes (`AUTHORITY`, `AXIS`, `DATUM`, `GEOGCS`, `PRIMEM`, `PROJCS`, `PROJECTION`, `SPHEROID`, `TOWGS84`,
/// `UNIT`) are converted into entities, any other node is returned as [`WktValue::Node`]. Both `[]` and `()` can be
/// used as brackets.
pub fn parse(text: &str) -> Result<WktValue, MeridianError> {
    let parser = Parser {
        text,
        bytes: text.as_bytes(),
    };
    let (value, position) = parser.parse_value(0, None, 0)?;
    let position = parser.skip_whitespace(position);
    if position < parser.bytes.len() {
        return Err(MeridianError::wkt(position, "unexpected text after the end of the definition"));
    }

    Ok(value)
}

/// Parses a `GEOGCS` or `PROJCS` definition.
pub fn parse_coordinate_system(text: &str) -> Result<CoordinateSystem, MeridianError> {
    let value = parse(text)?;
    let kind = value.kind().to_string();
    value
        .into_coordinate_system()
        .ok_or(MeridianError::NotCoordinateSystem(kind))
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
}

impl Parser<'_> {
    fn skip_whitespace(&self, mut position: usize) -> usize {
        while self
            .bytes
            .get(position)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            position += 1;
        }
        position
    }

    fn parse_value(
        &self,
        position: usize,
        parent: Option<&str>,
        depth: usize,
    ) -> Result<(WktValue, usize), MeridianError> {
        let position = self.skip_whitespace(position);
        if depth > MAX_DEPTH {
            return Err(MeridianError::wkt(position, format!("nodes nested deeper than {MAX_DEPTH} levels")));
        }
        match self.bytes.get(position) {
            None => Err(MeridianError::wkt(position, "unexpected end of text")),
            Some(b'"') => self.parse_string(position),
            Some(b) if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.') => self.parse_number(position),
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' => self.parse_named(position, parent, depth),
            Some(_) => Err(MeridianError::wkt(
                position,
                format!("unexpected character '{}'", self.char_at(position)),
            )),
        }
    }

    fn char_at(&self, position: usize) -> char {
        self.text
            .get(position..)
            .and_then(|s| s.chars().next())
            .unwrap_or('?')
    }

    fn parse_string(&self, start: usize) -> Result<(WktValue, usize), MeridianError> {
        let mut result = String::new();
        let mut position = start + 1;
        let mut segment_start = position;
        loop {
            match self.bytes.get(position) {
                None => return Err(MeridianError::wkt(start, "unterminated string")),
                Some(b'"') => {
                    result.push_str(&self.text[segment_start..position]);
                    if self.bytes.get(position + 1) == Some(&b'"') {
                        result.push('"');
                        position += 2;
                        segment_start = position;
                    } else {
                        return Ok((WktValue::String(result), position + 1));
                    }
                }
                Some(_) => position += 1,
            }
        }
    }

    fn parse_number(&self, start: usize) -> Result<(WktValue, usize), MeridianError> {
        let mut position = start;
        while self
            .bytes
            .get(position)
            .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            position += 1;
        }

        let text = &self.text[start..position];
        let value = text
            .parse::<f64>()
            .map_err(|_| MeridianError::wkt(start, format!("invalid number '{text}'")))?;
        Ok((WktValue::Number(value), position))
    }

    fn parse_named(
        &self,
        start: usize,
        parent: Option<&str>,
        depth: usize,
    ) -> Result<(WktValue, usize), MeridianError> {
        let mut position = start;
        while self
            .bytes
            .get(position)
            .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            position += 1;
        }
        let name = &self.text[start..position];

        let after_name = self.skip_whitespace(position);
        let closing = match self.bytes.get(after_name) {
            Some(b'[') => b']',
            Some(b'(') => b')',
            _ => return Ok((WktValue::Name(name.to_string()), position)),
        };

        let mut values = Vec::new();
        let mut position = self.skip_whitespace(after_name + 1);
        if self.bytes.get(position) == Some(&closing) {
            position += 1;
        } else {
            loop {
                let (value, next) = self.parse_value(position, Some(name), depth + 1)?;
                values.push(value);
                position = self.skip_whitespace(next);
                match self.bytes.get(position) {
                    Some(b',') => position += 1,
                    Some(b) if *b == closing => {
                        position += 1;
                        break;
                    }
                    Some(_) => {
                        return Err(MeridianError::wkt(
                            position,
                            format!("expected ',' or '{}' in {name}", closing as char),
                        ))
                    }
                    None => return Err(MeridianError::wkt(position, format!("unclosed {name}"))),
                }
            }
        }

        let value = Node {
            name,
            start,
            values,
        }
        .build(parent)?;
        Ok((value, position))
    }
}

struct Node<'a> {
    name: &'a str,
    start: usize,
    values: Vec<WktValue>,
}

impl Node<'_> {
    fn build(self, parent: Option<&str>) -> Result<WktValue, MeridianError> {
        let value = match self.name.to_ascii_uppercase().as_str() {
            "AUTHORITY" => WktValue::Authority(self.authority()?),
            "AXIS" => WktValue::Axis(self.axis()?),
            "DATUM" => WktValue::Datum(self.datum()?),
            "GEOGCS" => WktValue::Geographic(Box::new(self.geographic()?)),
            "PRIMEM" => WktValue::PrimeMeridian(self.prime_meridian()?),
            "PROJCS" => WktValue::Projected(Box::new(self.projected()?)),
            "PROJECTION" => WktValue::Projection(self.projection()?),
            "SPHEROID" | "ELLIPSOID" => WktValue::Spheroid(self.spheroid()?),
            "TOWGS84" => WktValue::ToWgs84(self.to_wgs84()?),
            "UNIT" if parent.is_some_and(|p| p.eq_ignore_ascii_case("GEOGCS")) => {
                let (name, factor, authority) = self.unit()?;
                let unit = AngularUnit::from_si_factor(name, factor);
                WktValue::AngularUnit(with_optional_authority(unit, authority, AngularUnit::with_authority))
            }
            "UNIT" => {
                let (name, factor, authority) = self.unit()?;
                let unit = LinearUnit::from_si_factor(name, factor);
                WktValue::LinearUnit(with_optional_authority(unit, authority, LinearUnit::with_authority))
            }
            _ => {
                if !self.name.eq_ignore_ascii_case("PARAMETER") {
                    log::debug!("Unknown WKT node {}, keeping its values", self.name);
                }
                WktValue::Node {
                    name: self.name.to_string(),
                    values: self.values,
                }
            }
        };

        Ok(value)
    }

    fn error(&self, message: impl std::fmt::Display) -> MeridianError {
        MeridianError::wkt(self.start, format!("{}: {message}", self.name))
    }

    fn string(&self, index: usize) -> Result<String, MeridianError> {
        self.values
            .get(index)
            .and_then(WktValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.error(format!("expected a string at position {index}")))
    }

    fn number(&self, index: usize) -> Result<f64, MeridianError> {
        self.values
            .get(index)
            .and_then(WktValue::as_number)
            .ok_or_else(|| self.error(format!("expected a number at position {index}")))
    }

    fn authority_child(&self) -> Option<Authority> {
        self.values.iter().find_map(|v| match v {
            WktValue::Authority(authority) => Some(authority.clone()),
            _ => None,
        })
    }

    fn axes(&self) -> Vec<Axis> {
        self.values
            .iter()
            .filter_map(|v| match v {
                WktValue::Axis(axis) => Some(axis.clone()),
                _ => None,
            })
            .collect()
    }

    fn authority(&self) -> Result<Authority, MeridianError> {
        let name = self.string(0)?;
        let code = match self.values.get(1) {
            Some(WktValue::Number(code)) => code.to_string(),
            Some(value) => value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.error("expected a code"))?,
            None => return Err(self.error("expected a code")),
        };
        Ok(Authority::new(name, code))
    }

    fn axis(&self) -> Result<Axis, MeridianError> {
        Ok(Axis::new(self.string(0)?, self.string(1)?))
    }

    fn spheroid(&self) -> Result<Spheroid, MeridianError> {
        let spheroid = Spheroid::new(self.string(0)?, self.number(1)?, f64::NAN, self.number(2)?);
        Ok(with_optional_authority(spheroid, self.authority_child(), Spheroid::with_authority))
    }

    fn to_wgs84(&self) -> Result<ToWgs84, MeridianError> {
        let values = self
            .values
            .iter()
            .map(|v| v.as_number().ok_or_else(|| self.error("expected numbers")))
            .collect::<Result<Vec<_>, _>>()?;
        ToWgs84::from_values(&values)
            .ok_or_else(|| self.error(format!("expected 3 or 7 values, found {}", values.len())))
    }

    fn datum(&self) -> Result<Datum, MeridianError> {
        let name = self.string(0)?;
        let mut spheroid = None;
        let mut to_wgs84 = None;
        for value in &self.values[1..] {
            match value {
                WktValue::Spheroid(s) => spheroid = Some(s.clone()),
                WktValue::ToWgs84(t) => to_wgs84 = Some(*t),
                _ => {}
            }
        }

        let spheroid = spheroid.ok_or_else(|| self.error("missing SPHEROID"))?;
        let mut datum = Datum::new(name, spheroid);
        if let Some(to_wgs84) = to_wgs84 {
            datum = datum.with_to_wgs84(to_wgs84);
        }
        Ok(with_optional_authority(datum, self.authority_child(), Datum::with_authority))
    }

    fn prime_meridian(&self) -> Result<PrimeMeridian, MeridianError> {
        let prime_meridian = PrimeMeridian::new(self.string(0)?, self.number(1)?);
        Ok(with_optional_authority(
            prime_meridian,
            self.authority_child(),
            PrimeMeridian::with_authority,
        ))
    }

    fn unit(&self) -> Result<(String, f64, Option<Authority>), MeridianError> {
        Ok((self.string(0)?, self.number(1)?, self.authority_child()))
    }

    fn projection(&self) -> Result<Projection, MeridianError> {
        let projection = Projection::new(self.string(0)?);
        Ok(with_optional_authority(projection, self.authority_child(), Projection::with_authority))
    }

    fn geographic(&self) -> Result<GeographicCoordinateSystem, MeridianError> {
        let name = self.string(0)?;
        let mut datum = None;
        let mut prime_meridian = None;
        let mut unit = None;
        for value in &self.values[1..] {
            match value {
                WktValue::Datum(d) => datum = Some(d.clone()),
                WktValue::PrimeMeridian(p) => prime_meridian = Some(p.clone()),
                WktValue::AngularUnit(u) => unit = Some(u.clone()),
                _ => {}
            }
        }

        let datum = datum.ok_or_else(|| self.error("missing DATUM"))?;
        let authority = self.authority_child();
        let cs = GeographicCoordinateSystem::new(
            coordinate_system_id(authority.as_ref()),
            name,
            datum,
            prime_meridian.unwrap_or_else(PrimeMeridian::greenwich),
            unit.unwrap_or_else(AngularUnit::degree),
            self.axes(),
        );
        Ok(with_optional_authority(cs, authority, GeographicCoordinateSystem::with_authority))
    }

    fn projected(&self) -> Result<ProjectedCoordinateSystem, MeridianError> {
        let name = self.string(0)?;
        let mut geographic = None;
        let mut projection = None;
        let mut parameters = ProjectionParameters::new();
        let mut unit = None;
        for value in &self.values[1..] {
            match value {
                WktValue::Geographic(g) => geographic = Some((**g).clone()),
                WktValue::Projection(p) => projection = Some(p.clone()),
                WktValue::LinearUnit(u) => unit = Some(u.clone()),
                WktValue::Node { name, values } if name.eq_ignore_ascii_case("PARAMETER") => {
                    match (values.first().and_then(WktValue::as_str), values.get(1).and_then(WktValue::as_number)) {
                        (Some(name), Some(value)) => parameters.insert(name, value),
                        _ => return Err(self.error("PARAMETER requires a name and a number")),
                    }
                }
                _ => {}
            }
        }

        let geographic = geographic.ok_or_else(|| self.error("missing GEOGCS"))?;
        let projection = projection.ok_or_else(|| self.error("missing PROJECTION"))?;
        let authority = self.authority_child();
        let cs = ProjectedCoordinateSystem::new(
            coordinate_system_id(authority.as_ref()),
            name,
            geographic,
            projection,
            parameters,
            unit.unwrap_or_else(LinearUnit::metre),
            self.axes(),
        );
        Ok(with_optional_authority(cs, authority, ProjectedCoordinateSystem::with_authority))
    }
}

// 0 without authority, -1 if the code is not an integer.
fn coordinate_system_id(authority: Option<&Authority>) -> i32 {
    match authority {
        Some(authority) => authority.id().unwrap_or(-1),
        None => 0,
    }
}

fn with_optional_authority<T>(value: T, authority: Option<Authority>, f: impl FnOnce(T, Authority) -> T) -> T {
    match authority {
        Some(authority) => f(value, authority),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::parameter_names::*;
    use crate::cs::CoordinateReferenceSystem;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    const WGS84: &str = r#"GEOGCS["WGS 84", DATUM["WGS_1984", SPHEROID["WGS 84",6378137,298.257223563]], PRIMEM["Greenwich",0], UNIT["degree",0.0174532925199433], AUTHORITY["EPSG","4326"]]"#;

    fn nztm(latitude_parameter: &str) -> String {
        format!(
            r#"PROJCS["NZGD2000 / New Zealand Transverse Mercator 2000",
                GEOGCS["NZGD2000",
                    DATUM["New_Zealand_Geodetic_Datum_2000",
                        SPHEROID["GRS 1980",6378137,298.257222101,AUTHORITY["EPSG","7019"]],
                        TOWGS84[0,0,0,0,0,0,0],
                        AUTHORITY["EPSG","6167"]],
                    PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],
                    UNIT["degree",0.01745329251994328,AUTHORITY["EPSG","9122"]],
                    AUTHORITY["EPSG","4167"]],
                PROJECTION["Transverse_Mercator"],
                PARAMETER["{latitude_parameter}",0],
                PARAMETER["central_meridian",173],
                PARAMETER["scale_factor",0.9996],
                PARAMETER["false_easting",1600000],
                PARAMETER["false_northing",10000000],
                UNIT["metre",1,AUTHORITY["EPSG","9001"]],
                AXIS["Easting",EAST],
                AXIS["Northing",NORTH],
                AUTHORITY["EPSG","2193"]]"#
        )
    }

    #[test]
    fn geographic_end_to_end() {
        let cs = parse_coordinate_system(WGS84).unwrap();
        assert_eq!(cs.id(), 4326);
        assert!(cs.is_geographic());

        let geographic = cs.geographic();
        assert_eq!(geographic.datum().spheroid().semi_major_axis(), 6_378_137.0);
        assert_abs_diff_eq!(geographic.datum().spheroid().semi_minor_axis(), 6_356_752.314, epsilon = 1e-3);
        assert_abs_diff_eq!(geographic.angular_unit().si_factor(), 0.017_453_29, epsilon = 1e-8);
        assert_eq!(cs.authority().map(|a| a.to_string()), Some("EPSG:4326".to_string()));

        let bbox = cs.area_bounding_box();
        assert_eq!(
            (bbox.min_x(), bbox.min_y(), bbox.max_x(), bbox.max_y()),
            (-180.0, -90.0, 180.0, 90.0)
        );
    }

    #[test]
    fn parsed_unit_is_canonical() {
        let cs = parse_coordinate_system(WGS84).unwrap();
        assert!(Arc::ptr_eq(
            cs.geographic().angular_unit().measure(),
            &crate::measure::degree()
        ));
    }

    #[test]
    fn projected() {
        let cs = parse_coordinate_system(&nztm("latitude_of_origin")).unwrap();
        assert_eq!(cs.id(), 2193);
        assert_eq!(cs.axes().len(), 2);

        let projected = cs.as_projected().unwrap();
        assert_eq!(projected.parameter(CENTRAL_MERIDIAN), Some(173.0));
        assert_eq!(projected.parameter("Latitude_Of_Natural_Origin"), Some(0.0));
        assert_eq!(projected.parameters().len(), 5);
        assert_eq!(projected.geographic().id(), 4167);
        assert!(projected.geographic().datum().to_wgs84().is_some());
        assert_eq!(projected.projection().normalized_name(), "transverse_mercator");
    }

    #[test]
    fn parameter_aliases_are_equal() {
        let a = parse_coordinate_system(&nztm("latitude_of_origin")).unwrap();
        let b = parse_coordinate_system(&nztm("latitude_of_natural_origin")).unwrap();
        let c = parse_coordinate_system(&nztm("latitude_of_false_origin")).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn unit_depends_on_parent() {
        let cs = parse_coordinate_system(&nztm("latitude_of_origin")).unwrap();
        assert_eq!(cs.unit().name(), "metre");
        assert_eq!(cs.geographic().unit().name(), "degree");
        assert_matches!(parse(r#"UNIT["foot",0.3048]"#), Ok(WktValue::LinearUnit(_)));
    }

    #[test]
    fn unknown_nodes_and_brackets() {
        let value = parse(r#"EXTENSION("PROJ4", "+proj=merc ""quoted"" 1e-3", NAME)"#).unwrap();
        assert_eq!(
            value,
            WktValue::Node {
                name: "EXTENSION".to_string(),
                values: vec![
                    WktValue::String("PROJ4".to_string()),
                    WktValue::String(r#"+proj=merc "quoted" 1e-3"#.to_string()),
                    WktValue::Name("NAME".to_string()),
                ],
            }
        );
        assert_matches!(parse("SPHEROID(\"s\", 6.4e6, 0)"), Ok(WktValue::Spheroid(s)) if s.is_sphere());
    }

    #[test]
    fn authority_ids() {
        let without = WGS84.replace(r#", AUTHORITY["EPSG","4326"]"#, "");
        assert_eq!(parse_coordinate_system(&without).unwrap().id(), 0);

        let textual = WGS84.replace(r#""4326""#, r#""WGS84""#);
        assert_eq!(parse_coordinate_system(&textual).unwrap().id(), -1);

        let numeric = WGS84.replace(r#""4326""#, "4326");
        assert_eq!(parse_coordinate_system(&numeric).unwrap().id(), 4326);
    }

    #[test]
    fn malformed() {
        assert_matches!(parse(r#"GEOGCS["WGS 84""#), Err(MeridianError::WktParse { .. }));
        assert_matches!(parse(r#"GEOGCS["WGS 84"] x"#), Err(MeridianError::WktParse { .. }));
        assert_matches!(parse(r#"SPHEROID["s", "a", 1]"#), Err(MeridianError::WktParse { position: 0, .. }));
        assert_matches!(parse(r#"DATUM["d"]"#), Err(MeridianError::WktParse { .. }));
        assert_matches!(parse(""), Err(MeridianError::WktParse { position: 0, .. }));
        assert_matches!(parse("TOWGS84[1,2]"), Err(MeridianError::WktParse { .. }));
        assert_matches!(
            parse_coordinate_system(r#"SPHEROID["s", 6378137, 298]"#),
            Err(MeridianError::NotCoordinateSystem(kind)) if kind == "SPHEROID"
        );
    }

    #[test]
    fn nesting_depth_is_limited() {
        assert_matches!(parse(&"A[".repeat(200_000)), Err(MeridianError::WktParse { .. }));

        let too_deep = format!("{}1{}", "A[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_matches!(parse(&too_deep), Err(MeridianError::WktParse { .. }));

        let deep = format!("{}1{}", "A[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert_matches!(parse(&deep), Ok(WktValue::Node { .. }));
    }
}
