//! Parametric latitude/longitude surfaces
//!
//! The (u, v) grid is sampled at `(nlat + 1) * (nlong + 1)` points. Each sample
//! maps to the unit direction
//! `(cos θ sin φ, cos φ, sin θ sin φ)` with `θ = 2πu`, `φ = πv`, scaled by a
//! radius that may itself depend on the direction and (u, v). A constant
//! radius gives a sphere; a radius function gives any star-shaped surface
//! sharing the same UV topology.

use std::fmt;

use super::GeneratedGeometry;
use crate::foundation::math::{
    constants::{PI, TAU},
    Vec3,
};
use crate::model::{GeometryError, Model, ModelOptions};

/// Default tessellation along each parametric axis
pub const DEFAULT_SEGMENTS: u32 = 10;

/// Radius of a parametric surface
pub enum Radius {
    /// The same radius everywhere
    Constant(f32),
    /// Radius from `(unit direction, u, v)`
    Function(Box<dyn Fn(Vec3, f32, f32) -> f32>),
}

impl Radius {
    /// Wrap a radius function
    pub fn function(radius: impl Fn(Vec3, f32, f32) -> f32 + 'static) -> Self {
        Self::Function(Box::new(radius))
    }

    fn at(&self, direction: Vec3, u: f32, v: f32) -> f32 {
        match self {
            Self::Constant(radius) => *radius,
            Self::Function(radius) => radius(direction, u, v),
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self::Constant(1.0)
    }
}

impl fmt::Debug for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(radius) => f.debug_tuple("Constant").field(radius).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Sphere construction parameters
#[derive(Debug)]
pub struct SphereOptions {
    /// Segments along u (longitude angle θ)
    pub nlat: u32,
    /// Segments along v (polar angle φ)
    pub nlong: u32,
    /// Surface radius
    pub radius: Radius,
    /// Model options; supplied geometry overrides the generated arrays
    pub model: ModelOptions,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            nlat: DEFAULT_SEGMENTS,
            nlong: DEFAULT_SEGMENTS,
            radius: Radius::default(),
            model: ModelOptions::default(),
        }
    }
}

impl SphereOptions {
    /// Default sphere: radius 1, 10 x 10 segments
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tessellation
    pub fn with_segments(mut self, nlat: u32, nlong: u32) -> Self {
        self.nlat = nlat;
        self.nlong = nlong;
        self
    }

    /// Set the radius
    pub fn with_radius(mut self, radius: Radius) -> Self {
        self.radius = radius;
        self
    }

    /// Set the model options
    pub fn with_model(mut self, model: ModelOptions) -> Self {
        self.model = model;
        self
    }
}

/// Tessellate a parametric lat/long surface
///
/// Vertices are emitted row by row (v outer, u inner). Each grid cell
/// `(x, y)` becomes two triangles with row stride `nlat + 1`:
/// `(y·s + x, y·s + x + 1, (y+1)·s + x)` and
/// `((y+1)·s + x, y·s + x + 1, (y+1)·s + x + 1)`.
pub fn tessellate(nlat: u32, nlong: u32, radius: &Radius) -> Result<GeneratedGeometry, GeometryError> {
    if nlat == 0 || nlong == 0 {
        return Err(GeometryError::InvalidTessellation { nlat, nlong });
    }

    let vertex_count = ((nlat + 1) * (nlong + 1)) as usize;
    let mut vertices = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);
    let mut tex_coords = Vec::with_capacity(vertex_count * 2);

    for y in 0..=nlong {
        for x in 0..=nlat {
            let u = x as f32 / nlat as f32;
            let v = y as f32 / nlong as f32;
            let theta = TAU * u;
            let phi = PI * v;

            let direction = Vec3::new(theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            let r = radius.at(direction, u, v);

            vertices.extend_from_slice((direction * r).as_slice());
            normals.extend_from_slice(direction.as_slice());
            tex_coords.extend_from_slice(&[u, v]);
        }
    }

    let stride = nlat + 1;
    let mut indices = Vec::with_capacity((nlat * nlong * 6) as usize);
    for x in 0..nlat {
        for y in 0..nlong {
            indices.extend_from_slice(&[
                y * stride + x,
                y * stride + x + 1,
                (y + 1) * stride + x,
            ]);
            indices.extend_from_slice(&[
                (y + 1) * stride + x,
                y * stride + x + 1,
                (y + 1) * stride + x + 1,
            ]);
        }
    }

    Ok(GeneratedGeometry {
        vertices,
        normals,
        tex_coords,
        indices,
    })
}

/// Build a sphere (or other parametric surface) model
pub fn sphere(options: SphereOptions) -> Result<Model, GeometryError> {
    let geometry = tessellate(options.nlat, options.nlong, &options.radius)?;
    log::debug!(
        "Tessellated parametric surface {}x{} ({} vertices)",
        options.nlat,
        options.nlong,
        geometry.vertices.len() / 3
    );
    Model::new(geometry.under(options.model))
}
