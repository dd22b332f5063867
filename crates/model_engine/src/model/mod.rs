//! Renderable models
//!
//! A [`Model`] is plain geometric data (positions, normals, colors, texture
//! coordinates, indices, faces) plus a local transform. Models are built from
//! a [`ModelOptions`] bag, derive missing attributes on request, and are
//! pushed to a rendering backend through [`crate::render::AttributeSync`].
//!
//! # Derived attributes
//!
//! Color replication always runs at construction so every vertex has an RGBA
//! color. Centroids and per-face normals are derived when
//! `compute_centroids` / `compute_normals` are set, or later through the
//! explicit recomputation methods.
//!
//! # Transform
//!
//! `position`, `rotation` and `scale` are public and may be changed at any
//! time, but [`Model::matrix`] only follows them after [`Model::update`].

pub mod error;
pub mod geometry;
pub mod packed;
pub mod transform;

pub use error::GeometryError;
pub use packed::{PackedData, PackedFormat};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::Config;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{AttributeSync, DrawCall, RenderBackend, RenderResult, TextureId, UniformValue};

/// Stable model identifier; namespaces the model's GPU buffer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u64);

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

impl ModelId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primitive topology used when drawing a model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawType {
    /// Individual points
    Points,
    /// Independent line segments
    Lines,
    /// Closed line loop
    LineLoop,
    /// Connected line strip
    LineStrip,
    /// Independent triangles
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Triangle fan
    TriangleFan,
}

/// Texture coordinates in one of two shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TexCoords {
    /// One set of coordinates (2 floats per vertex) for a single texture
    Flat(Vec<f32>),
    /// One coordinate set per texture, keyed by texture handle
    PerTexture(BTreeMap<TextureId, Vec<f32>>),
}

/// Callback attached to a model's render pass
///
/// Hooks receive the model and the backend it is being rendered with.
pub type ModelHook = Box<dyn Fn(&Model, &mut dyn RenderBackend) -> RenderResult<()>>;

/// Configuration bag accepted by [`Model::new`]
///
/// Every field is optional. Hooks are skipped when (de)serializing, so a
/// model description can otherwise live in a `.toml` or `.ron` file.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Explicit id; allocated with [`ModelId::next`] when absent
    pub id: Option<ModelId>,
    /// Flat positions, 3 per vertex
    pub vertices: Option<Vec<f32>>,
    /// Polygons used for centroid and normal derivation
    pub faces: Option<Vec<Vec<u32>>>,
    /// Flat normals, 3 per vertex (or per face when derived)
    pub normals: Option<Vec<f32>>,
    /// Texture handles in binding order; a single handle is accepted too
    #[serde(deserialize_with = "one_or_many")]
    pub textures: Option<Vec<TextureId>>,
    /// Precomputed face centroids
    pub centroids: Option<Vec<[f32; 3]>>,
    /// Flat RGBA colors
    pub colors: Option<Vec<f32>>,
    /// Triangle indices
    pub indices: Option<Vec<u32>>,
    /// Specular shininess; 0 when absent
    pub shininess: Option<f32>,
    /// Shader uniforms pushed verbatim on every render
    pub uniforms: Option<BTreeMap<String, UniformValue>>,
    /// Primitive topology; triangles when absent
    pub draw_type: Option<DrawType>,
    /// Texture coordinates
    pub tex_coords: Option<TexCoords>,
    /// Derive centroids from `faces` at construction
    pub compute_centroids: bool,
    /// Derive per-face normals from `faces` at construction
    pub compute_normals: bool,
    /// Re-upload every buffer on every synchronization call
    pub dynamic: bool,
    /// Replaces the default draw call
    #[serde(skip)]
    pub render: Option<ModelHook>,
    /// Runs before synchronization
    #[serde(skip)]
    pub on_before_render: Option<ModelHook>,
    /// Runs after the draw
    #[serde(skip)]
    pub on_after_render: Option<ModelHook>,
}

impl Config for ModelOptions {}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrMany<T>>::deserialize(deserializer)?.map(|value| match value {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    }))
}

impl ModelOptions {
    /// Empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit id
    pub fn with_id(mut self, id: ModelId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set flat positions
    pub fn with_vertices(mut self, vertices: Vec<f32>) -> Self {
        self.vertices = Some(vertices);
        self
    }

    /// Set positions from per-vertex triples
    pub fn with_nested_vertices(self, vertices: &[[f32; 3]]) -> Self {
        self.with_vertices(vertices.iter().flatten().copied().collect())
    }

    /// Set faces
    pub fn with_faces(mut self, faces: Vec<Vec<u32>>) -> Self {
        self.faces = Some(faces);
        self
    }

    /// Set flat normals
    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Set normals from per-vertex triples
    pub fn with_nested_normals(self, normals: &[[f32; 3]]) -> Self {
        self.with_normals(normals.iter().flatten().copied().collect())
    }

    /// Set flat RGBA colors
    pub fn with_colors(mut self, colors: Vec<f32>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Set colors from RGBA quadruples
    pub fn with_nested_colors(self, colors: &[[f32; 4]]) -> Self {
        self.with_colors(colors.iter().flatten().copied().collect())
    }

    /// Set triangle indices
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Set texture coordinates
    pub fn with_tex_coords(mut self, tex_coords: TexCoords) -> Self {
        self.tex_coords = Some(tex_coords);
        self
    }

    /// Append a texture handle
    pub fn with_texture(mut self, texture: impl Into<TextureId>) -> Self {
        self.textures.get_or_insert_with(Vec::new).push(texture.into());
        self
    }

    /// Set shininess
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = Some(shininess);
        self
    }

    /// Add a uniform
    pub fn with_uniform(mut self, name: impl Into<String>, value: impl Into<UniformValue>) -> Self {
        self.uniforms
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the primitive topology
    pub fn with_draw_type(mut self, draw_type: DrawType) -> Self {
        self.draw_type = Some(draw_type);
        self
    }

    /// Request centroid derivation at construction
    pub fn computing_centroids(mut self) -> Self {
        self.compute_centroids = true;
        self
    }

    /// Request normal derivation at construction
    pub fn computing_normals(mut self) -> Self {
        self.compute_normals = true;
        self
    }

    /// Mark the model dynamic
    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Replace the default draw call
    pub fn with_render_hook(
        mut self,
        hook: impl Fn(&Model, &mut dyn RenderBackend) -> RenderResult<()> + 'static,
    ) -> Self {
        self.render = Some(Box::new(hook));
        self
    }

    /// Run a hook before synchronization
    pub fn with_before_render(
        mut self,
        hook: impl Fn(&Model, &mut dyn RenderBackend) -> RenderResult<()> + 'static,
    ) -> Self {
        self.on_before_render = Some(Box::new(hook));
        self
    }

    /// Run a hook after the draw
    pub fn with_after_render(
        mut self,
        hook: impl Fn(&Model, &mut dyn RenderBackend) -> RenderResult<()> + 'static,
    ) -> Self {
        self.on_after_render = Some(Box::new(hook));
        self
    }
}

impl fmt::Debug for ModelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelOptions")
            .field("id", &self.id)
            .field("vertices", &self.vertices.as_ref().map(Vec::len))
            .field("faces", &self.faces.as_ref().map(Vec::len))
            .field("indices", &self.indices.as_ref().map(Vec::len))
            .field("compute_centroids", &self.compute_centroids)
            .field("compute_normals", &self.compute_normals)
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}

/// A renderable geometric entity with raw attribute arrays and a local transform
pub struct Model {
    id: ModelId,
    matrix: Mat4,

    /// Flat positions, 3 per vertex
    pub vertices: Option<Vec<f32>>,
    /// Triangle indices; absent means a non-indexed draw
    pub indices: Option<Vec<u32>>,
    /// Polygons used for derivation only
    pub faces: Option<Vec<Vec<u32>>>,
    /// Flat normals
    pub normals: Option<Vec<f32>>,
    /// Flat RGBA colors
    pub colors: Option<Vec<f32>>,
    /// Texture coordinates
    pub tex_coords: Option<TexCoords>,
    /// Texture handles in binding order
    pub textures: Vec<TextureId>,
    /// One point per face
    pub centroids: Option<Vec<Vec3>>,
    /// Shader uniforms, opaque to the model
    pub uniforms: BTreeMap<String, UniformValue>,
    /// Specular shininess
    pub shininess: f32,
    /// Primitive topology
    pub draw_type: DrawType,
    /// Re-upload buffers on every synchronization call
    pub dynamic: bool,

    /// Local position
    pub position: Vec3,
    /// Euler XYZ rotation in radians
    pub rotation: Vec3,
    /// Non-uniform scale
    pub scale: Vec3,

    render_hook: Option<ModelHook>,
    on_before_render: Option<ModelHook>,
    on_after_render: Option<ModelHook>,
}

impl Model {
    /// Build a model from a configuration bag
    ///
    /// Validates array strides and index ranges, replicates colors to cover
    /// every vertex, and derives centroids and normals when requested.
    pub fn new(options: ModelOptions) -> Result<Self, GeometryError> {
        if let Some(vertices) = &options.vertices {
            geometry::validate_stride("vertices", vertices, geometry::POSITION_COMPONENTS)?;
            if let Some(indices) = &options.indices {
                geometry::validate_indices(vertices, indices)?;
            }
        }
        if let Some(TexCoords::Flat(coords)) = &options.tex_coords {
            geometry::validate_stride("texCoords", coords, geometry::TEX_COORD_COMPONENTS)?;
        }

        let mut model = Self {
            id: options.id.unwrap_or_else(ModelId::next),
            matrix: Mat4::identity(),
            vertices: options.vertices,
            indices: options.indices,
            faces: options.faces,
            normals: options.normals,
            colors: options.colors,
            tex_coords: options.tex_coords,
            textures: options.textures.unwrap_or_default(),
            centroids: options
                .centroids
                .map(|points| points.into_iter().map(Vec3::from).collect()),
            uniforms: options.uniforms.unwrap_or_default(),
            shininess: options.shininess.unwrap_or(0.0),
            draw_type: options.draw_type.unwrap_or_default(),
            dynamic: options.dynamic,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            render_hook: options.render,
            on_before_render: options.on_before_render,
            on_after_render: options.on_after_render,
        };

        model.normalize_colors();

        if options.compute_centroids {
            model.compute_centroids()?;
        }
        if options.compute_normals {
            model.compute_normals()?;
        }

        log::debug!(
            "Created model {} ({} vertices, {} indices, dynamic: {})",
            model.id,
            model.vertex_count(),
            model.indices.as_ref().map_or(0, Vec::len),
            model.dynamic
        );

        Ok(model)
    }

    /// Stable identifier
    pub const fn id(&self) -> ModelId {
        self.id
    }

    /// Model matrix as of the last [`Model::update`]
    pub const fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Number of whole vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.as_deref().map_or(0, geometry::vertex_count)
    }

    /// Recompute the model matrix from position, rotation and scale
    pub fn update(&mut self) {
        self.matrix = transform::compose(&self.position, &self.rotation, &self.scale);
    }

    /// Replicate colors so every vertex has an RGBA entry
    pub fn normalize_colors(&mut self) {
        if let (Some(vertices), Some(colors)) = (&self.vertices, &mut self.colors) {
            geometry::normalize_colors(vertices, colors);
        }
    }

    /// Recompute one centroid per face; no-op without faces
    pub fn compute_centroids(&mut self) -> Result<(), GeometryError> {
        if let Some(faces) = &self.faces {
            let vertices = self.vertices.as_deref().unwrap_or_default();
            self.centroids = Some(geometry::compute_centroids(vertices, faces)?);
        }
        Ok(())
    }

    /// Recompute one flat normal per face; no-op without faces
    pub fn compute_normals(&mut self) -> Result<(), GeometryError> {
        if let Some(faces) = &self.faces {
            let vertices = self.vertices.as_deref().unwrap_or_default();
            self.normals = Some(geometry::compute_normals(vertices, faces)?);
        }
        Ok(())
    }

    /// Draw call the model issues when it has no custom render hook
    pub fn draw_call(&self) -> DrawCall {
        match &self.indices {
            Some(indices) => DrawCall {
                mode: self.draw_type,
                count: indices.len(),
                indexed: true,
            },
            None => DrawCall {
                mode: self.draw_type,
                count: self.vertex_count(),
                indexed: false,
            },
        }
    }

    /// Render one frame of this model
    ///
    /// Runs the before-render hook, synchronizes every attribute, draws
    /// (through the custom render hook when one is set), then runs the
    /// after-render hook. [`Model::update`] must already have been called
    /// for this frame if the transform changed.
    pub fn render(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        if let Some(hook) = &self.on_before_render {
            hook(self, backend)?;
        }

        self.sync_all(backend, force)?;

        match &self.render_hook {
            Some(hook) => hook(self, backend)?,
            None => backend.draw(self.draw_call())?,
        }

        if let Some(hook) = &self.on_after_render {
            hook(self, backend)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("vertices", &self.vertex_count())
            .field("indices", &self.indices.as_ref().map(Vec::len))
            .field("textures", &self.textures)
            .field("draw_type", &self.draw_type)
            .field("dynamic", &self.dynamic)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}
