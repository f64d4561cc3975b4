use crate::cs::{
    AngularUnit, Authority, Axis, CoordinateSystem, Datum, GeographicCoordinateSystem, LinearUnit, PrimeMeridian,
    ProjectedCoordinateSystem, Projection, Spheroid, ToWgs84,
};

/// Parsed WKT value. Known nodes are converted into entities, unknown ones are kept as [`WktValue::Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    /// Quoted string.
    String(String),
    /// Number.
    Number(f64),
    /// Bare word without brackets, e.g. an axis direction.
    Name(String),
    /// Node with a name not known to the parser, e.g. `PARAMETER`.
    Node {
        /// Node name as written.
        name: String,
        /// Values inside the brackets.
        values: Vec<WktValue>,
    },
    /// `AUTHORITY` node.
    Authority(Authority),
    /// `AXIS` node.
    Axis(Axis),
    /// `DATUM` node.
    Datum(Datum),
    /// `GEOGCS` node.
    Geographic(Box<GeographicCoordinateSystem>),
    /// `PRIMEM` node.
    PrimeMeridian(PrimeMeridian),
    /// `PROJCS` node.
    Projected(Box<ProjectedCoordinateSystem>),
    /// `PROJECTION` node.
    Projection(Projection),
    /// `SPHEROID` node.
    Spheroid(Spheroid),
    /// `TOWGS84` node.
    ToWgs84(ToWgs84),
    /// `UNIT` node inside `GEOGCS`.
    AngularUnit(AngularUnit),
    /// `UNIT` node anywhere else.
    LinearUnit(LinearUnit),
}

impl WktValue {
    /// String or bare name content.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WktValue::String(s) | WktValue::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            WktValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Converts the value into a coordinate system, if it is one.
    pub fn into_coordinate_system(self) -> Option<CoordinateSystem> {
        match self {
            WktValue::Geographic(cs) => Some(CoordinateSystem::Geographic(*cs)),
            WktValue::Projected(cs) => Some(CoordinateSystem::Projected(*cs)),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &str {
        match self {
            WktValue::String(_) => "string",
            WktValue::Number(_) => "number",
            WktValue::Name(_) => "name",
            WktValue::Node { name, .. } => name,
            WktValue::Authority(_) => "AUTHORITY",
            WktValue::Axis(_) => "AXIS",
            WktValue::Datum(_) => "DATUM",
            WktValue::Geographic(_) => "GEOGCS",
            WktValue::PrimeMeridian(_) => "PRIMEM",
            WktValue::Projected(_) => "PROJCS",
            WktValue::Projection(_) => "PROJECTION",
            WktValue::Spheroid(_) => "SPHEROID",
            WktValue::ToWgs84(_) => "TOWGS84",
            WktValue::AngularUnit(_) | WktValue::LinearUnit(_) => "UNIT",
        }
    }
}
