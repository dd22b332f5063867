//! Reference cube geometry
//!
//! A cube of side 2 centered at the origin, spanning [-1, 1] on every axis.
//! Each face has its own 4 vertices so normals and texture coordinates stay
//! flat per face: 24 vertices, 36 indices (2 triangles per face).
//!
//! Face order: front (+Z), back (-Z), top (+Y), bottom (-Y), right (+X),
//! left (-X). These tables are the canonical reference geometry and must not
//! be reordered.

use super::GeneratedGeometry;
use crate::model::{GeometryError, Model, ModelOptions, TexCoords};

/// Cube vertex positions, 3 per vertex
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 72] = [
    // Front face
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,

    // Back face
    -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0, -1.0, -1.0,

    // Top face
    -1.0,  1.0, -1.0,
    -1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,
     1.0,  1.0, -1.0,

    // Bottom face
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0, -1.0,  1.0,
    -1.0, -1.0,  1.0,

    // Right face
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
     1.0,  1.0,  1.0,
     1.0, -1.0,  1.0,

    // Left face
    -1.0, -1.0, -1.0,
    -1.0, -1.0,  1.0,
    -1.0,  1.0,  1.0,
    -1.0,  1.0, -1.0,
];

/// Cube texture coordinates, 2 per vertex
#[rustfmt::skip]
pub const CUBE_TEX_COORDS: [f32; 48] = [
    // Front face
    0.0, 0.0,
    1.0, 0.0,
    1.0, 1.0,
    0.0, 1.0,

    // Back face
    1.0, 0.0,
    1.0, 1.0,
    0.0, 1.0,
    0.0, 0.0,

    // Top face
    0.0, 1.0,
    0.0, 0.0,
    1.0, 0.0,
    1.0, 1.0,

    // Bottom face
    1.0, 1.0,
    0.0, 1.0,
    0.0, 0.0,
    1.0, 0.0,

    // Right face
    1.0, 0.0,
    1.0, 1.0,
    0.0, 1.0,
    0.0, 0.0,

    // Left face
    0.0, 0.0,
    1.0, 0.0,
    1.0, 1.0,
    0.0, 1.0,
];

/// Outward per-face normals, 3 per vertex
#[rustfmt::skip]
pub const CUBE_NORMALS: [f32; 72] = [
    // Front face
     0.0,  0.0,  1.0,
     0.0,  0.0,  1.0,
     0.0,  0.0,  1.0,
     0.0,  0.0,  1.0,

    // Back face
     0.0,  0.0, -1.0,
     0.0,  0.0, -1.0,
     0.0,  0.0, -1.0,
     0.0,  0.0, -1.0,

    // Top face
     0.0,  1.0,  0.0,
     0.0,  1.0,  0.0,
     0.0,  1.0,  0.0,
     0.0,  1.0,  0.0,

    // Bottom face
     0.0, -1.0,  0.0,
     0.0, -1.0,  0.0,
     0.0, -1.0,  0.0,
     0.0, -1.0,  0.0,

    // Right face
     1.0,  0.0,  0.0,
     1.0,  0.0,  0.0,
     1.0,  0.0,  0.0,
     1.0,  0.0,  0.0,

    // Left face
    -1.0,  0.0,  0.0,
    -1.0,  0.0,  0.0,
    -1.0,  0.0,  0.0,
    -1.0,  0.0,  0.0,
];

/// Triangle indices, 6 per face
#[rustfmt::skip]
pub const CUBE_INDICES: [u32; 36] = [
     0,  1,  2,   0,  2,  3,
     4,  5,  6,   4,  6,  7,
     8,  9, 10,   8, 10, 11,
    12, 13, 14,  12, 14, 15,
    16, 17, 18,  16, 18, 19,
    20, 21, 22,  20, 22, 23,
];

/// Build the reference cube
///
/// Any geometry supplied in `options` replaces the corresponding table;
/// everything else (colors, textures, flags, hooks) passes through.
pub fn cube(options: ModelOptions) -> Result<Model, GeometryError> {
    let geometry = GeneratedGeometry {
        vertices: CUBE_VERTICES.to_vec(),
        normals: CUBE_NORMALS.to_vec(),
        tex_coords: CUBE_TEX_COORDS.to_vec(),
        indices: CUBE_INDICES.to_vec(),
    };
    Model::new(geometry.under(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_cube_reference_counts() {
        let cube = cube(ModelOptions::new()).unwrap();

        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.as_ref().map(Vec::len), Some(36));
        assert_eq!(cube.normals.as_ref().map(|n| n.len() / 3), Some(24));
        match &cube.tex_coords {
            Some(TexCoords::Flat(coords)) => assert_eq!(coords.len() / 2, 24),
            other => panic!("expected flat texture coordinates, got {other:?}"),
        }
    }

    #[test]
    fn test_cube_matches_tables_exactly() {
        let cube = cube(ModelOptions::new()).unwrap();

        assert_eq!(cube.vertices.as_deref(), Some(&CUBE_VERTICES[..]));
        assert_eq!(cube.normals.as_deref(), Some(&CUBE_NORMALS[..]));
        assert_eq!(cube.indices.as_deref(), Some(&CUBE_INDICES[..]));
        assert_eq!(cube.tex_coords, Some(TexCoords::Flat(CUBE_TEX_COORDS.to_vec())));
    }

    #[test]
    fn test_cube_spans_unit_box() {
        for vertex in CUBE_VERTICES.chunks(3) {
            assert!(vertex.iter().all(|c| c.abs() == 1.0));
        }
    }

    #[test]
    fn test_cube_normals_point_outward() {
        // Every vertex lies on its face plane, so the normal points the same way as the position
        for (position, normal) in CUBE_VERTICES.chunks(3).zip(CUBE_NORMALS.chunks(3)) {
            let p = Vec3::from_column_slice(position);
            let n = Vec3::from_column_slice(normal);
            assert_eq!(n.norm(), 1.0);
            assert_eq!(p.dot(&n), 1.0);
        }
    }

    #[test]
    fn test_cube_each_face_uses_its_own_vertices() {
        for (face, triangles) in CUBE_INDICES.chunks(6).enumerate() {
            let base = face as u32 * 4;
            assert!(triangles.iter().all(|&i| (base..base + 4).contains(&i)));
        }
    }

    #[test]
    fn test_cube_options_override_and_pass_through() {
        let cube = cube(
            ModelOptions::new()
                .with_colors(vec![1.0, 0.0, 0.0, 1.0])
                .with_indices(vec![0, 1, 2])
                .with_dynamic(true),
        )
        .unwrap();

        assert_eq!(cube.indices, Some(vec![0, 1, 2]));
        assert_eq!(cube.colors.as_ref().map(Vec::len), Some(96));
        assert!(cube.dynamic);
        assert_eq!(cube.vertex_count(), 24);
    }
}
