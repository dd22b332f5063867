//! Attribute synchronization
//!
//! Decides, per attribute and per call, whether a model's geometry is packed
//! and uploaded again or whether the backend should reuse the buffer already
//! registered under the attribute's key.
//!
//! The policy keeps no state on this side:
//!
//! - absent or empty attribute: nothing happens
//! - `force` or a dynamic model: pack and upload under `<attr>-<id>`
//! - otherwise: ask the backend to reuse `<attr>-<id>`
//!
//! Upload history lives in the backend, which reports an error when asked to
//! reuse a key it never received. Uniforms, shininess and texture flags have
//! no caching tier and are pushed on every call.

use super::{
    Attribute, BufferDescriptor, BufferKey, BufferKind, BufferUsage, RenderBackend, RenderResult,
    TextureUnit, UniformValue,
};
use crate::model::geometry::{COLOR_COMPONENTS, NORMAL_COMPONENTS, POSITION_COMPONENTS, TEX_COORD_COMPONENTS};
use crate::model::{Model, PackedData, TexCoords};

/// Buffer key name for positions
pub const VERTICES_KEY: &str = "vertices";
/// Buffer key name for normals
pub const NORMALS_KEY: &str = "normals";
/// Buffer key name for colors
pub const COLORS_KEY: &str = "colors";
/// Buffer key name for indices
pub const INDICES_KEY: &str = "indices";
/// Buffer key name for texture coordinates
pub const TEX_COORDS_KEY: &str = "texCoords";

/// Uniform carrying the model's shininess
pub const SHININESS_UNIFORM: &str = "shininess";

/// `hasTexture<n>` uniform name for a 0-based texture slot
pub fn has_texture_uniform(slot: usize) -> String {
    format!("hasTexture{}", slot + 1)
}

/// `sampler<n>` uniform name for a 0-based texture slot
pub fn sampler_uniform(slot: usize) -> String {
    format!("sampler{}", slot + 1)
}

/// Capability to push a model's attributes to a rendering backend
///
/// Every method takes the backend explicitly. Methods with a `force` flag
/// upload when `force` is set or the model is dynamic, and signal reuse
/// otherwise. The attribute setters are independent of each other and may
/// run in any order before the draw call.
pub trait AttributeSync {
    /// Push every user uniform verbatim
    fn set_uniforms(&self, backend: &mut dyn RenderBackend) -> RenderResult<()>;

    /// Push the shininess uniform
    fn set_shininess(&self, backend: &mut dyn RenderBackend) -> RenderResult<()>;

    /// Sync positions (`position`, 3 components)
    fn set_vertices(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()>;

    /// Sync normals (`normal`, 3 components)
    fn set_normals(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()>;

    /// Sync colors (`color`, 4 components)
    fn set_colors(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()>;

    /// Sync the index buffer (1 component, 16-bit)
    fn set_indices(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()>;

    /// Sync texture coordinates (`texCoord<n>`, 2 components)
    fn set_tex_coords(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()>;

    /// Bind textures and set `hasTexture<n>` for every slot up to the backend limit
    fn set_textures(&self, backend: &mut dyn RenderBackend) -> RenderResult<()>;

    /// Run every setter once
    fn sync_all(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        self.set_uniforms(backend)?;
        self.set_shininess(backend)?;
        self.set_vertices(backend, force)?;
        self.set_normals(backend, force)?;
        self.set_colors(backend, force)?;
        self.set_tex_coords(backend, force)?;
        self.set_textures(backend)?;
        self.set_indices(backend, force)
    }
}

impl Model {
    fn should_upload(&self, force: bool) -> bool {
        force || self.dynamic
    }

    fn usage(&self) -> BufferUsage {
        if self.dynamic {
            BufferUsage::Dynamic
        } else {
            BufferUsage::Static
        }
    }

    fn sync_float_buffer(
        &self,
        backend: &mut dyn RenderBackend,
        key: &BufferKey,
        attribute: Attribute,
        values: &[f32],
        components: usize,
        force: bool,
    ) -> RenderResult<()> {
        if values.is_empty() {
            return Ok(());
        }

        if self.should_upload(force) {
            log::debug!("Uploading {} floats to '{}' ({})", values.len(), key, attribute);
            backend.upload_buffer(
                key,
                BufferDescriptor {
                    attribute: Some(attribute),
                    data: PackedData::from_f32(values),
                    components: components as u32,
                    kind: BufferKind::Array,
                    usage: self.usage(),
                },
            )
        } else {
            log::trace!("Reusing buffer '{}'", key);
            backend.reuse_buffer(key)
        }
    }

    fn sync_optional_floats(
        &self,
        backend: &mut dyn RenderBackend,
        name: &str,
        attribute: Attribute,
        values: Option<&[f32]>,
        components: usize,
        force: bool,
    ) -> RenderResult<()> {
        let Some(values) = values else {
            return Ok(());
        };
        let key = BufferKey::new(name, self.id());
        self.sync_float_buffer(backend, &key, attribute, values, components, force)
    }
}

impl AttributeSync for Model {
    fn set_uniforms(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.set_uniforms(&self.uniforms)
    }

    fn set_shininess(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        backend.set_uniform(SHININESS_UNIFORM, UniformValue::Float(self.shininess))
    }

    fn set_vertices(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        self.sync_optional_floats(
            backend,
            VERTICES_KEY,
            Attribute::Position,
            self.vertices.as_deref(),
            POSITION_COMPONENTS,
            force,
        )
    }

    fn set_normals(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        self.sync_optional_floats(
            backend,
            NORMALS_KEY,
            Attribute::Normal,
            self.normals.as_deref(),
            NORMAL_COMPONENTS,
            force,
        )
    }

    fn set_colors(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        self.sync_optional_floats(
            backend,
            COLORS_KEY,
            Attribute::Color,
            self.colors.as_deref(),
            COLOR_COMPONENTS,
            force,
        )
    }

    fn set_indices(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        let Some(indices) = self.indices.as_deref().filter(|indices| !indices.is_empty()) else {
            return Ok(());
        };
        let key = BufferKey::new(INDICES_KEY, self.id());

        if self.should_upload(force) {
            log::debug!("Uploading {} indices to '{}'", indices.len(), key);
            backend.upload_buffer(
                &key,
                BufferDescriptor {
                    attribute: None,
                    data: PackedData::from_indices(indices)?,
                    components: 1,
                    kind: BufferKind::ElementArray,
                    usage: self.usage(),
                },
            )
        } else {
            log::trace!("Reusing buffer '{}'", key);
            backend.reuse_buffer(&key)
        }
    }

    fn set_tex_coords(&self, backend: &mut dyn RenderBackend, force: bool) -> RenderResult<()> {
        match &self.tex_coords {
            None => Ok(()),
            Some(TexCoords::Flat(coords)) => {
                let key = BufferKey::new(TEX_COORDS_KEY, self.id());
                self.sync_float_buffer(
                    backend,
                    &key,
                    Attribute::TexCoord(1),
                    coords,
                    TEX_COORD_COMPONENTS,
                    force,
                )
            }
            Some(TexCoords::PerTexture(per_texture)) => {
                for (slot, texture) in self.textures.iter().enumerate() {
                    let Some(coords) = per_texture.get(texture) else {
                        log::warn!(
                            "Model {} has no texture coordinates for texture '{}'; skipping slot {}",
                            self.id(),
                            texture,
                            slot
                        );
                        continue;
                    };
                    let key = BufferKey::tex_coords_for_slot(slot, self.id());
                    self.sync_float_buffer(
                        backend,
                        &key,
                        Attribute::TexCoord(slot as u32 + 1),
                        coords,
                        TEX_COORD_COMPONENTS,
                        force,
                    )?;
                }
                Ok(())
            }
        }
    }

    fn set_textures(&self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        let max_textures = backend.max_textures();
        if self.textures.len() > max_textures {
            log::warn!(
                "Model {} has {} textures but the backend binds only {}; ignoring the rest",
                self.id(),
                self.textures.len(),
                max_textures
            );
        }

        for slot in 0..max_textures {
            match self.textures.get(slot) {
                Some(texture) => {
                    backend.set_uniform(&has_texture_uniform(slot), UniformValue::Bool(true))?;
                    backend.set_uniform(&sampler_uniform(slot), UniformValue::Int(slot as i32))?;
                    backend.set_texture(texture, TextureUnit(slot as u32))?;
                }
                None => {
                    backend.set_uniform(&has_texture_uniform(slot), UniformValue::Bool(false))?;
                }
            }
        }
        Ok(())
    }
}
