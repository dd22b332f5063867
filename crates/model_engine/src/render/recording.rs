//! In-memory rendering backend
//!
//! `RecordingBackend` implements [`RenderBackend`] without a GPU. It keeps
//! the buffers registered under each key, the last value of every uniform and
//! the texture bound to each unit, and logs every call in order. Reuse of a
//! key that was never uploaded fails exactly like a real backend would.
//!
//! Used by the unit tests and by the demo application to inspect what a
//! frame of synchronization actually did.

use std::collections::{BTreeMap, HashMap};

use super::{
    Attribute, BufferDescriptor, BufferKey, BufferKind, BufferUsage, DrawCall, RenderBackend,
    RenderError, RenderResult, TextureId, TextureUnit, UniformValue,
};
use crate::model::ModelId;

/// Default number of texture units
pub const DEFAULT_MAX_TEXTURES: usize = 10;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `set_uniform`
    Uniform {
        /// Uniform name
        name: String,
        /// Value written
        value: UniformValue,
    },
    /// `upload_buffer`
    Upload {
        /// Buffer key
        key: String,
        /// Attribute fed, if any
        attribute: Option<Attribute>,
        /// Components per element
        components: u32,
        /// Buffer target
        kind: BufferKind,
        /// Usage hint
        usage: BufferUsage,
        /// Uploaded size in bytes
        byte_len: usize,
    },
    /// `reuse_buffer`
    Reuse {
        /// Buffer key
        key: String,
    },
    /// `set_texture`
    Texture {
        /// Texture handle
        texture: TextureId,
        /// Texture unit
        unit: TextureUnit,
    },
    /// `draw`
    Draw(DrawCall),
}

/// Backend that records calls and tracks registered state in memory
#[derive(Debug)]
pub struct RecordingBackend {
    max_textures: usize,
    buffers: HashMap<BufferKey, BufferDescriptor>,
    uniforms: HashMap<String, UniformValue>,
    textures: BTreeMap<TextureUnit, TextureId>,
    calls: Vec<BackendCall>,
    uploads: usize,
    reuses: usize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEXTURES)
    }
}

impl RecordingBackend {
    /// Create a backend exposing `max_textures` texture units
    pub fn new(max_textures: usize) -> Self {
        Self {
            max_textures,
            buffers: HashMap::new(),
            uniforms: HashMap::new(),
            textures: BTreeMap::new(),
            calls: Vec::new(),
            uploads: 0,
            reuses: 0,
        }
    }

    /// Buffer currently registered under `key`
    pub fn buffer(&self, key: &BufferKey) -> Option<&BufferDescriptor> {
        self.buffers.get(key)
    }

    /// Number of registered buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Last value written to a uniform
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Texture bound to a unit
    pub fn bound_texture(&self, unit: TextureUnit) -> Option<&TextureId> {
        self.textures.get(&unit)
    }

    /// Every call since creation or the last [`RecordingBackend::clear_calls`]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Draw calls only
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Draw(draw) => Some(*draw),
                _ => None,
            })
            .collect()
    }

    /// Total number of buffer uploads
    pub const fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Total number of buffer reuse signals
    pub const fn reuse_count(&self) -> usize {
        self.reuses
    }

    /// Forget the call log and counters; registered state is kept
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.uploads = 0;
        self.reuses = 0;
    }

    /// Release every buffer registered for a discarded model
    ///
    /// Returns the number of buffers released.
    pub fn release_model(&mut self, model: ModelId) -> usize {
        let before = self.buffers.len();
        self.buffers.retain(|key, _| key.model() != model);
        let released = before - self.buffers.len();
        log::debug!("Released {} buffers of model {}", released, model);
        released
    }
}

impl RenderBackend for RecordingBackend {
    fn max_textures(&self) -> usize {
        self.max_textures
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()> {
        self.calls.push(BackendCall::Uniform {
            name: name.to_string(),
            value: value.clone(),
        });
        self.uniforms.insert(name.to_string(), value);
        Ok(())
    }

    fn upload_buffer(&mut self, key: &BufferKey, descriptor: BufferDescriptor) -> RenderResult<()> {
        self.calls.push(BackendCall::Upload {
            key: key.to_string(),
            attribute: descriptor.attribute,
            components: descriptor.components,
            kind: descriptor.kind,
            usage: descriptor.usage,
            byte_len: descriptor.data.byte_len(),
        });
        self.uploads += 1;
        self.buffers.insert(key.clone(), descriptor);
        Ok(())
    }

    fn reuse_buffer(&mut self, key: &BufferKey) -> RenderResult<()> {
        if !self.buffers.contains_key(key) {
            return Err(RenderError::UnknownBuffer(key.to_string()));
        }
        self.calls.push(BackendCall::Reuse { key: key.to_string() });
        self.reuses += 1;
        Ok(())
    }

    fn set_texture(&mut self, texture: &TextureId, unit: TextureUnit) -> RenderResult<()> {
        if unit.0 as usize >= self.max_textures {
            return Err(RenderError::BackendError(format!(
                "texture unit {} exceeds the {} available units",
                unit.0, self.max_textures
            )));
        }
        self.calls.push(BackendCall::Texture {
            texture: texture.clone(),
            unit,
        });
        self.textures.insert(unit, texture.clone());
        Ok(())
    }

    fn draw(&mut self, call: DrawCall) -> RenderResult<()> {
        self.calls.push(BackendCall::Draw(call));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DrawType, PackedData};

    fn descriptor() -> BufferDescriptor {
        BufferDescriptor {
            attribute: Some(Attribute::Position),
            data: PackedData::from_f32(&[0.0; 9]),
            components: 3,
            kind: BufferKind::Array,
            usage: BufferUsage::Static,
        }
    }

    #[test]
    fn test_reuse_requires_prior_upload() {
        let mut backend = RecordingBackend::default();
        let key = BufferKey::new("vertices", ModelId(1));

        assert!(matches!(backend.reuse_buffer(&key), Err(RenderError::UnknownBuffer(_))));
        backend.upload_buffer(&key, descriptor()).unwrap();
        backend.reuse_buffer(&key).unwrap();
        assert_eq!((backend.upload_count(), backend.reuse_count()), (1, 1));
    }

    #[test]
    fn test_upload_replaces_registered_buffer() {
        let mut backend = RecordingBackend::default();
        let key = BufferKey::new("vertices", ModelId(1));
        backend.upload_buffer(&key, descriptor()).unwrap();

        let mut smaller = descriptor();
        smaller.data = PackedData::from_f32(&[1.0; 3]);
        backend.upload_buffer(&key, smaller).unwrap();

        assert_eq!(backend.buffer_count(), 1);
        assert_eq!(backend.buffer(&key).map(|b| b.data.len()), Some(3));
    }

    #[test]
    fn test_release_model_only_drops_its_buffers() {
        let mut backend = RecordingBackend::default();
        backend.upload_buffer(&BufferKey::new("vertices", ModelId(1)), descriptor()).unwrap();
        backend.upload_buffer(&BufferKey::new("normals", ModelId(1)), descriptor()).unwrap();
        backend.upload_buffer(&BufferKey::new("vertices", ModelId(11)), descriptor()).unwrap();

        assert_eq!(backend.release_model(ModelId(1)), 2);
        assert_eq!(backend.buffer_count(), 1);
        assert!(backend.reuse_buffer(&BufferKey::new("vertices", ModelId(1))).is_err());
        assert!(backend.reuse_buffer(&BufferKey::new("vertices", ModelId(11))).is_ok());
    }

    #[test]
    fn test_texture_unit_bounds() {
        let mut backend = RecordingBackend::new(2);
        let texture = TextureId::new("albedo");
        backend.set_texture(&texture, TextureUnit(1)).unwrap();
        assert!(backend.set_texture(&texture, TextureUnit(2)).is_err());
    }

    #[test]
    fn test_draw_calls_recorded_in_order() {
        let mut backend = RecordingBackend::default();
        let first = DrawCall { mode: DrawType::Triangles, count: 36, indexed: true };
        let second = DrawCall { mode: DrawType::Points, count: 8, indexed: false };
        backend.draw(first).unwrap();
        backend.set_uniform("shininess", UniformValue::Float(1.0)).unwrap();
        backend.draw(second).unwrap();

        assert_eq!(backend.draw_calls(), vec![first, second]);
        backend.clear_calls();
        assert!(backend.calls().is_empty());
        assert_eq!(backend.uniform("shininess"), Some(&UniformValue::Float(1.0)));
    }
}
