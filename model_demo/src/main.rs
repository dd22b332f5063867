//! Model demo application
//!
//! Builds a small scene of primitives from a config file and runs a few
//! frames of attribute synchronization against the in-memory backend,
//! logging what each frame uploaded and reused.
//!
//! Usage: `model_demo [scene.toml|scene.ron]`

use model_engine::config::{Config, ConfigError, Deserialize, Serialize};
use model_engine::foundation::logging::{self, LoggingConfig};
use model_engine::foundation::math::Vec3;
use model_engine::model::{GeometryError, Model, ModelOptions};
use model_engine::primitives::{cube, sphere, Radius, SphereOptions};
use model_engine::render::{RecordingBackend, RenderError, DEFAULT_MAX_TEXTURES};

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("failed to load scene: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid model geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Primitive generator for one scene entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Primitive {
    Cube,
    Sphere {
        #[serde(default = "default_segments")]
        nlat: u32,
        #[serde(default = "default_segments")]
        nlong: u32,
        #[serde(default = "default_radius")]
        radius: f32,
    },
}

fn default_segments() -> u32 {
    model_engine::primitives::sphere::DEFAULT_SEGMENTS
}

fn default_radius() -> f32 {
    1.0
}

/// One model in the scene
#[derive(Debug, Serialize, Deserialize)]
struct SceneModel {
    primitive: Primitive,
    #[serde(default)]
    position: [f32; 3],
    #[serde(default)]
    rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    scale: [f32; 3],
    /// Rotation added every frame, radians per axis
    #[serde(default)]
    spin: [f32; 3],
    /// Geometry and material overrides passed to the generator
    #[serde(default)]
    options: ModelOptions,
}

fn unit_scale() -> [f32; 3] {
    [1.0; 3]
}

/// Scene file contents
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct SceneConfig {
    log_filter: Option<String>,
    frames: u32,
    max_textures: usize,
    models: Vec<SceneModel>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            frames: 3,
            max_textures: DEFAULT_MAX_TEXTURES,
            models: vec![
                SceneModel {
                    primitive: Primitive::Cube,
                    position: [-2.0, 0.0, -6.0],
                    rotation: [0.0; 3],
                    scale: unit_scale(),
                    spin: [0.0, 0.1, 0.0],
                    options: ModelOptions::new().with_colors(vec![0.8, 0.7, 0.5, 1.0]),
                },
                SceneModel {
                    primitive: Primitive::Sphere {
                        nlat: 16,
                        nlong: 16,
                        radius: 1.0,
                    },
                    position: [2.0, 0.0, -6.0],
                    rotation: [0.0; 3],
                    scale: unit_scale(),
                    spin: [0.0; 3],
                    options: ModelOptions::new().with_dynamic(true).with_shininess(32.0),
                },
            ],
        }
    }
}

impl Config for SceneConfig {}

fn build_model(entry: SceneModel) -> Result<Model, GeometryError> {
    let mut model = match entry.primitive {
        Primitive::Cube => cube(entry.options)?,
        Primitive::Sphere { nlat, nlong, radius } => sphere(
            SphereOptions::new()
                .with_segments(nlat, nlong)
                .with_radius(Radius::Constant(radius))
                .with_model(entry.options),
        )?,
    };

    model.position = Vec3::from(entry.position);
    model.rotation = Vec3::from(entry.rotation);
    model.scale = Vec3::from(entry.scale);
    model.update();
    Ok(model)
}

fn run(scene: SceneConfig) -> Result<(), DemoError> {
    let mut models = Vec::with_capacity(scene.models.len());
    for entry in scene.models {
        let kind = format!("{:?}", entry.primitive);
        let spin = Vec3::from(entry.spin);
        let model = build_model(entry)?;
        log::info!("Built {} model {} ({} vertices)", kind, model.id(), model.vertex_count());
        models.push((model, spin));
    }

    let mut backend = RecordingBackend::new(scene.max_textures);

    for frame in 0..scene.frames {
        backend.clear_calls();

        for (model, spin) in &mut models {
            model.rotation += *spin;
            model.update();
            model.render(&mut backend, frame == 0)?;
        }

        log::info!(
            "Frame {}: {} uploads, {} reuses, {} draws, {} buffers registered",
            frame,
            backend.upload_count(),
            backend.reuse_count(),
            backend.draw_calls().len(),
            backend.buffer_count()
        );
    }

    for (model, _) in &models {
        backend.release_model(model.id());
    }
    log::info!("Released all model buffers ({} remaining)", backend.buffer_count());

    Ok(())
}

fn main() {
    let path = std::env::args().nth(1);

    let scene = match path.as_deref() {
        Some(path) => match SceneConfig::load_from_file(path) {
            Ok(scene) => scene,
            Err(e) => {
                logging::init(LoggingConfig::default());
                log::error!("{}", DemoError::from(e));
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };

    logging::init(LoggingConfig {
        env_filter: scene.log_filter.clone(),
        ..Default::default()
    });
    log::info!("Starting model demo with {} models", scene.models.len());

    if let Err(e) = run(scene) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }

    log::info!("Model demo finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_runs() {
        run(SceneConfig::default()).unwrap();
    }

    #[test]
    fn test_scene_parses_from_toml() {
        let scene = SceneConfig::from_str_with_format(include_str!("../scenes/demo.toml"), "demo.toml").unwrap();
        assert_eq!(scene.frames, 4);
        assert_eq!(scene.models.len(), 3);
        assert!(matches!(scene.models[1].primitive, Primitive::Sphere { nlat: 12, .. }));
        run(scene).unwrap();
    }
}
