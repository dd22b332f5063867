//! # Model Engine
//!
//! Renderable 3D models as plain geometric data plus a local transform, and
//! the policy that keeps their GPU attribute buffers in sync with a rendering
//! backend.
//!
//! ## Features
//!
//! - **Geometry Core**: flat vertex/normal/color/texture-coordinate arrays with
//!   color replication, per-face centroids and per-face normals
//! - **Transforms**: position, Euler XYZ rotation and scale composed into a 4x4 matrix
//! - **Attribute Synchronization**: upload-or-reuse decisions per attribute,
//!   keyed by model id
//! - **Primitives**: reference cube and parametric lat/long surfaces
//!
//! ## Quick Start
//!
//! ```rust
//! use model_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut backend = RecordingBackend::default();
//!     let mut sphere = sphere(SphereOptions::new().with_segments(16, 16))?;
//!
//!     sphere.position = Vec3::new(0.0, 1.0, -5.0);
//!     sphere.update();
//!
//!     // First frame uploads, later frames reuse the registered buffers
//!     sphere.render(&mut backend, true)?;
//!     sphere.render(&mut backend, false)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod model;
pub mod primitives;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            logging::LoggingConfig,
            math::{Mat4, Vec3},
        },
        model::{DrawType, GeometryError, Model, ModelId, ModelOptions, TexCoords},
        primitives::{cube, sphere, Radius, SphereOptions},
        render::{
            AttributeSync, RecordingBackend, RenderBackend, RenderError, RenderResult, TextureId,
            UniformValue,
        },
    };
}
