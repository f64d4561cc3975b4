use std::fmt::Debug;

use crate::error::MeridianError;
use crate::operation::{perform_xy, CoordinateOperation};
use crate::Point2d;

/// Projection math: conversion between geographic coordinates (longitude, latitude in radians) and projected
/// coordinates in metres.
pub trait CoordinatesProjection: Debug + Send + Sync {
    /// Projects geographic coordinates. Returns `None` if the point cannot be projected.
    fn project(&self, lon_lat: &Point2d) -> Option<Point2d>;
    /// Inverse of [`CoordinatesProjection::project`].
    fn unproject(&self, projected: &Point2d) -> Option<Point2d>;
}

/// Operation applying [`CoordinatesProjection::project`].
#[derive(Debug)]
pub struct ForwardProjection {
    projection: Box<dyn CoordinatesProjection>,
}

impl ForwardProjection {
    /// Wraps the projection.
    pub fn new(projection: Box<dyn CoordinatesProjection>) -> Self {
        Self { projection }
    }
}

impl CoordinateOperation for ForwardProjection {
    fn perform(
        &self,
        axis_count: usize,
        from: &[f64],
        to_axis_count: usize,
        to: &mut [f64],
    ) -> Result<(), MeridianError> {
        perform_xy(axis_count, from, to_axis_count, to, |x, y| {
            self.projection
                .project(&Point2d::new(x, y))
                .map(|p| (p.x, p.y))
        })
    }
}

/// Operation applying [`CoordinatesProjection::unproject`].
#[derive(Debug)]
pub struct InverseProjection {
    projection: Box<dyn CoordinatesProjection>,
}

impl InverseProjection {
    /// Wraps the projection.
    pub fn new(projection: Box<dyn CoordinatesProjection>) -> Self {
        Self { projection }
    }
}

impl CoordinateOperation for InverseProjection {
    fn perform(
        &self,
        axis_count: usize,
        from: &[f64],
        to_axis_count: usize,
        to: &mut [f64],
    ) -> Result<(), MeridianError> {
        perform_xy(axis_count, from, to_axis_count, to, |x, y| {
            self.projection
                .unproject(&Point2d::new(x, y))
                .map(|p| (p.x, p.y))
        })
    }
}
