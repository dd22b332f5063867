//! Rendering backend contract and attribute synchronization
//!
//! This core never owns GPU objects. It talks to a [`RenderBackend`] through a
//! small set of calls: upload a packed buffer under a key, reuse whatever is
//! registered under a key, set a uniform, bind a texture, issue a draw. The
//! backend handle and its limits are always passed in explicitly.
//!
//! ## Buffer keys
//!
//! Every attribute buffer is registered under a [`BufferKey`] namespaced by
//! the owning model's id (`vertices-7`, `texCoords-1-7`, ...). Callers must keep
//! model ids unique among live models; the backend owns releasing buffers
//! when a model is discarded.

pub mod recording;
pub mod sync;

pub use recording::{BackendCall, RecordingBackend, DEFAULT_MAX_TEXTURES};
pub use sync::AttributeSync;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DrawType, GeometryError, ModelId, PackedData};

/// Handle of an externally loaded texture
///
/// Textures are loaded and owned by the backend; models only carry the
/// handle. The handle also keys per-texture coordinate sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureId(pub String);

impl TextureId {
    /// Create a texture handle
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// GPU texture unit index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureUnit(pub u32);

/// Value of a shader uniform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer (also used for sampler units)
    Int(i32),
    /// Scalar float
    Float(f32),
    /// 2-component vector
    Vec2([f32; 2]),
    /// 3-component vector
    Vec3([f32; 3]),
    /// 4-component vector
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix
    Mat4([[f32; 4]; 4]),
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(value: [f32; 3]) -> Self {
        Self::Vec3(value)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(value: [f32; 4]) -> Self {
        Self::Vec4(value)
    }
}

impl From<crate::foundation::math::Mat4> for UniformValue {
    fn from(value: crate::foundation::math::Mat4) -> Self {
        Self::Mat4(value.into())
    }
}

/// Semantic vertex attribute a buffer feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// `position`
    Position,
    /// `normal`
    Normal,
    /// `color`
    Color,
    /// `texCoord<n>`, 1-based
    TexCoord(u32),
}

impl Attribute {
    /// Shader attribute name
    pub fn name(self) -> String {
        match self {
            Self::Position => "position".to_string(),
            Self::Normal => "normal".to_string(),
            Self::Color => "color".to_string(),
            Self::TexCoord(n) => format!("texCoord{n}"),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Key under which a model's attribute buffer is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BufferKey {
    name: String,
    model: ModelId,
}

impl BufferKey {
    /// Key for a named attribute buffer of a model (`<name>-<id>`)
    pub fn new(name: impl Into<String>, model: ModelId) -> Self {
        Self {
            name: name.into(),
            model,
        }
    }

    /// Key for one texture's coordinate set (`texCoords-<slot>-<id>`)
    pub fn tex_coords_for_slot(slot: usize, model: ModelId) -> Self {
        Self::new(format!("{}-{slot}", sync::TEX_COORDS_KEY), model)
    }

    /// Attribute part of the key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning model
    pub const fn model(&self) -> ModelId {
        self.model
    }
}

impl fmt::Display for BufferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.model)
    }
}

/// GPU buffer target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data
    Array,
    /// Triangle index data
    ElementArray,
}

/// Upload usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    Static,
    /// Re-uploaded every frame
    Dynamic,
}

/// Payload of a buffer upload
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDescriptor {
    /// Attribute fed by this buffer; `None` for index buffers
    pub attribute: Option<Attribute>,
    /// Packed contents
    pub data: PackedData,
    /// Components per element
    pub components: u32,
    /// Buffer target
    pub kind: BufferKind,
    /// Usage hint
    pub usage: BufferUsage,
}

/// A single draw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Primitive topology
    pub mode: DrawType,
    /// Number of indices (indexed) or vertices (non-indexed) to draw
    pub count: usize,
    /// Whether the bound index buffer is used
    pub indexed: bool,
}

/// Main rendering backend trait
///
/// Implementations own GPU buffers and textures. `reuse_buffer` for a key
/// that was never uploaded must fail with [`RenderError::UnknownBuffer`].
pub trait RenderBackend {
    /// Maximum number of simultaneously bound textures
    fn max_textures(&self) -> usize;

    /// Set a single shader uniform
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()>;

    /// Set every uniform in a map, in key order
    fn set_uniforms(&mut self, uniforms: &BTreeMap<String, UniformValue>) -> RenderResult<()> {
        for (name, value) in uniforms {
            self.set_uniform(name, value.clone())?;
        }
        Ok(())
    }

    /// Register (or replace) the buffer stored under `key` and bind it
    fn upload_buffer(&mut self, key: &BufferKey, descriptor: BufferDescriptor) -> RenderResult<()>;

    /// Bind the buffer previously registered under `key`
    fn reuse_buffer(&mut self, key: &BufferKey) -> RenderResult<()>;

    /// Bind a texture to a texture unit
    fn set_texture(&mut self, texture: &TextureId, unit: TextureUnit) -> RenderResult<()>;

    /// Issue a draw call with the currently bound state
    fn draw(&mut self, call: DrawCall) -> RenderResult<()>;
}

/// Errors that can occur during rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Reuse was requested for a key with no registered buffer
    #[error("No buffer registered under key '{0}'")]
    UnknownBuffer(String),

    /// Model geometry could not be materialized
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
