//! Procedural primitives
//!
//! Factory functions returning fully populated [`Model`](crate::model::Model)
//! values. Primitives are ordinary models once built; nothing downstream
//! depends on which generator produced them.
//!
//! - [`cube`]: the 24-vertex reference cube spanning [-1, 1]³
//! - [`sphere`]: parametric lat/long surfaces with constant or functional radius

pub mod cube;
pub mod sphere;

pub use cube::cube;
pub use sphere::{sphere, tessellate, Radius, SphereOptions};

use crate::model::{ModelOptions, TexCoords};

/// Geometry produced by a generator before it becomes a model
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedGeometry {
    /// Flat positions, 3 per vertex
    pub vertices: Vec<f32>,
    /// Flat normals, 3 per vertex
    pub normals: Vec<f32>,
    /// Flat texture coordinates, 2 per vertex
    pub tex_coords: Vec<f32>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl GeneratedGeometry {
    /// Use this geometry wherever `options` leaves an attribute unset
    pub fn under(self, mut options: ModelOptions) -> ModelOptions {
        options.vertices.get_or_insert(self.vertices);
        options.normals.get_or_insert(self.normals);
        options.tex_coords.get_or_insert(TexCoords::Flat(self.tex_coords));
        options.indices.get_or_insert(self.indices);
        options
    }
}
