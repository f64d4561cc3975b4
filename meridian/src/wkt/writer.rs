use std::fmt::Write;

use crate::cs::{
    AngularUnit, Authority, Axis, CoordinateReferenceSystem, CoordinateSystem, Datum, GeographicCoordinateSystem,
    LinearUnit, PrimeMeridian, ProjectedCoordinateSystem, Projection, Spheroid, ToWgs84,
};

/// Entities that can be written as WKT. The output parses back into an equal entity.
pub trait ToWkt {
    /// Appends the WKT node to `out`.
    fn write_wkt(&self, out: &mut String);

    /// WKT node as a string.
    fn to_wkt(&self) -> String {
        let mut out = String::new();
        self.write_wkt(&mut out);
        out
    }
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    out.push_str(&value.replace('"', "\"\""));
    out.push('"');
}

fn write_number(out: &mut String, value: f64) {
    let _ = write!(out, "{value}");
}

fn write_authority(out: &mut String, authority: Option<&Authority>) {
    if let Some(authority) = authority {
        out.push(',');
        authority.write_wkt(out);
    }
}

fn write_unit(out: &mut String, name: &str, si_factor: f64, authority: Option<&Authority>) {
    out.push_str("UNIT[");
    write_string(out, name);
    out.push(',');
    write_number(out, si_factor);
    write_authority(out, authority);
    out.push(']');
}

fn write_axes(out: &mut String, axes: &[Axis]) {
    for axis in axes {
        out.push(',');
        axis.write_wkt(out);
    }
}

impl ToWkt for Authority {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("AUTHORITY[");
        write_string(out, self.name());
        out.push(',');
        write_string(out, self.code());
        out.push(']');
    }
}

impl ToWkt for Axis {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("AXIS[");
        write_string(out, self.name());
        out.push(',');
        let direction = self.direction();
        if !direction.is_empty() && direction.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            out.push_str(direction);
        } else {
            write_string(out, direction);
        }
        out.push(']');
    }
}

impl ToWkt for Spheroid {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("SPHEROID[");
        write_string(out, self.name());
        out.push(',');
        write_number(out, self.semi_major_axis());
        out.push(',');
        let inverse_flattening = if self.is_sphere() {
            0.0
        } else {
            self.inverse_flattening()
        };
        write_number(out, inverse_flattening);
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for ToWgs84 {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("TOWGS84[");
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_number(out, *value);
        }
        out.push(']');
    }
}

impl ToWkt for Datum {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("DATUM[");
        write_string(out, self.name());
        out.push(',');
        self.spheroid().write_wkt(out);
        if let Some(to_wgs84) = self.to_wgs84() {
            out.push(',');
            to_wgs84.write_wkt(out);
        }
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for PrimeMeridian {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("PRIMEM[");
        write_string(out, self.name());
        out.push(',');
        write_number(out, self.longitude());
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for AngularUnit {
    fn write_wkt(&self, out: &mut String) {
        write_unit(out, self.name(), self.declared_si_factor(), self.authority());
    }
}

impl ToWkt for LinearUnit {
    fn write_wkt(&self, out: &mut String) {
        write_unit(out, self.name(), self.declared_si_factor(), self.authority());
    }
}

impl ToWkt for Projection {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("PROJECTION[");
        write_string(out, self.name());
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for GeographicCoordinateSystem {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("GEOGCS[");
        write_string(out, self.name());
        out.push(',');
        self.datum().write_wkt(out);
        out.push(',');
        self.prime_meridian().write_wkt(out);
        out.push(',');
        self.angular_unit().write_wkt(out);
        write_axes(out, self.axes());
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for ProjectedCoordinateSystem {
    fn write_wkt(&self, out: &mut String) {
        out.push_str("PROJCS[");
        write_string(out, self.name());
        out.push(',');
        self.geographic().write_wkt(out);
        out.push(',');
        self.projection().write_wkt(out);
        for (name, value) in self.parameters().iter() {
            out.push_str(",PARAMETER[");
            write_string(out, name.as_str());
            out.push(',');
            write_number(out, value);
            out.push(']');
        }
        out.push(',');
        self.linear_unit().write_wkt(out);
        write_axes(out, self.axes());
        write_authority(out, self.authority());
        out.push(']');
    }
}

impl ToWkt for CoordinateSystem {
    fn write_wkt(&self, out: &mut String) {
        match self {
            CoordinateSystem::Geographic(cs) => cs.write_wkt(out),
            CoordinateSystem::Projected(cs) => cs.write_wkt(out),
        }
    }
}
