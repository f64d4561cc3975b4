//! Meridian is the spatial reference kernel of a GIS toolkit. It models coordinate reference systems, reads and
//! writes their WKT definitions, rounds coordinates with precision models and keeps bounding boxes that can be
//! reprojected between coordinate systems.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use meridian::cs::CoordinateSystemRegistry;
//! use meridian::geometry::GeometryFactoryRegistry;
//!
//! let systems = CoordinateSystemRegistry::new();
//! systems.register_wkt(
//!     r#"GEOGCS["WGS 84",
//!         DATUM["WGS_1984", SPHEROID["WGS 84",6378137,298.257223563]],
//!         PRIMEM["Greenwich",0],
//!         UNIT["degree",0.0174532925199433],
//!         AUTHORITY["EPSG","4326"]]"#,
//! )?;
//!
//! let factories = GeometryFactoryRegistry::new(Arc::new(systems));
//! let bbox = factories.parse_bounding_box("SRID=4326;BBOX(-10,-10 10,10)")?;
//! assert_eq!(bbox.expand(5.0, 0.0).to_string(), "SRID=4326;BBOX(-15,-10 15,10)");
//! # Ok::<(), meridian::MeridianError>(())
//! ```
//!
//! # Reprojection
//!
//! Boxes are converted between coordinate systems with [`BoundingBox::convert`], which samples the boundary of the
//! box, since the image of a rectangle under a map projection is generally not a rectangle. Coordinate operations
//! come from a [`CoordinateOperationProvider`](operation::CoordinateOperationProvider), by default the global
//! [`ProjectionRegistry`](operation::ProjectionRegistry) with the Pseudo Mercator and Equirectangular projections.
//! Other projections can be registered there, or with the `geodesy` feature, backed by the `geodesy` crate.

pub mod bounding_box;
pub mod config;
pub mod cs;
mod error;
pub mod geometry;
pub mod measure;
pub mod operation;
pub mod precision;
pub mod wkt;

pub use bounding_box::BoundingBox;
pub use config::ReprojectionConfig;
pub use error::MeridianError;
pub use precision::PrecisionModel;

/// 2d point used by coordinate operations and projections.
pub type Point2d = nalgebra::Point2<f64>;
