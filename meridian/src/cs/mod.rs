//! Coordinate reference system entities.
//!
//! All entities are immutable values. Each of them has a relaxed `PartialEq` implementation that compares what
//! matters for coordinate transformations (ignoring names, ids and authorities), and an `equals_exact` method
//! comparing all fields.

mod area;
mod authority;
mod axis;
mod coordinate_system;
mod datum;
mod geographic;
pub mod parameter_names;
mod parameters;
mod prime_meridian;
pub mod projection;
mod projected;
mod registry;
mod spheroid;
mod unit;

pub use area::Area;
pub use authority::Authority;
pub use axis::Axis;
pub use coordinate_system::{CoordinateReferenceSystem, CoordinateSystem};
pub use datum::{Datum, ToWgs84};
pub use geographic::GeographicCoordinateSystem;
pub use parameter_names::ParameterName;
pub use parameters::ProjectionParameters;
pub use prime_meridian::PrimeMeridian;
pub use projected::ProjectedCoordinateSystem;
pub use projection::Projection;
pub use registry::{CoordinateSystemLookup, CoordinateSystemRegistry};
pub use spheroid::Spheroid;
pub use unit::{Angular, AngularUnit, Linear, LinearUnit, UnitKind, UnitOfMeasure};

/// Lower-cases the name and collapses every run of non-alphanumeric characters into a single `_`.
pub(crate) fn normalize_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !result.is_empty() {
                result.push('_');
            }
            pending_separator = false;
            result.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    result
}
