//! Geometry derivation
//!
//! Pure functions that derive attributes from a flat vertex array:
//! per-vertex color replication, per-face centroids and per-face normals.
//! Vertex `i` occupies `vertices[3 * i..3 * i + 3]`.

use super::error::GeometryError;
use crate::foundation::math::{constants::NORMALIZE_EPSILON, Vec3};

/// Components per vertex position
pub const POSITION_COMPONENTS: usize = 3;

/// Components per normal
pub const NORMAL_COMPONENTS: usize = 3;

/// Components per RGBA color
pub const COLOR_COMPONENTS: usize = 4;

/// Components per texture coordinate
pub const TEX_COORD_COMPONENTS: usize = 2;

/// Number of whole vertices in a flat position array
pub fn vertex_count(vertices: &[f32]) -> usize {
    vertices.len() / POSITION_COMPONENTS
}

/// Replicate `colors` cyclically until every vertex has an RGBA entry
///
/// The existing sequence is treated as a repeating pattern. The result has
/// the smallest length that is a multiple of the original length and covers
/// `4 * vertex_count` floats; colors are never truncated. Does nothing when
/// there are no vertices or no colors, or when coverage is already sufficient.
pub fn normalize_colors(vertices: &[f32], colors: &mut Vec<f32>) {
    if vertices.is_empty() || colors.is_empty() {
        return;
    }

    let required = vertices.len() * COLOR_COMPONENTS / POSITION_COMPONENTS;
    if colors.len() >= required {
        return;
    }

    let repeats = required.div_ceil(colors.len());
    *colors = colors.repeat(repeats);
}

/// Arithmetic mean of each face's vertices, in face order
pub fn compute_centroids(vertices: &[f32], faces: &[Vec<u32>]) -> Result<Vec<Vec3>, GeometryError> {
    faces
        .iter()
        .enumerate()
        .map(|(face_index, face)| {
            if face.is_empty() {
                return Err(GeometryError::EmptyFace { face: face_index });
            }

            let mut sum = Vec3::zeros();
            for &index in face {
                sum += vertex_at(vertices, face_index, index)?;
            }
            Ok(sum / face.len() as f32)
        })
        .collect()
}

/// One flat-shading normal per face, stored as 3 floats per face
///
/// Only the first three vertices of each face are used. The cross product is
/// normalized unless its magnitude is at most `1e-6`, in which case the raw
/// vector is kept.
///
/// The first edge vector takes its z component from `v3.y - v2.z`, not
/// `v3.z - v2.z`. Callers rely on this exact output.
pub fn compute_normals(vertices: &[f32], faces: &[Vec<u32>]) -> Result<Vec<f32>, GeometryError> {
    let mut normals = Vec::with_capacity(faces.len() * NORMAL_COMPONENTS);

    for (face_index, face) in faces.iter().enumerate() {
        let [i1, i2, i3] = match face.as_slice() {
            [a, b, c, ..] => [*a, *b, *c],
            _ => {
                return Err(GeometryError::DegenerateFace {
                    face: face_index,
                    len: face.len(),
                })
            }
        };

        let v1 = vertex_at(vertices, face_index, i1)?;
        let v2 = vertex_at(vertices, face_index, i2)?;
        let v3 = vertex_at(vertices, face_index, i3)?;

        let dir1 = Vec3::new(v3.x - v2.x, v3.y - v2.y, v3.y - v2.z);
        let dir2 = v1 - v2;

        let mut normal = dir2.cross(&dir1);
        if normal.norm() > NORMALIZE_EPSILON {
            normal.normalize_mut();
        }

        normals.extend_from_slice(normal.as_slice());
    }

    Ok(normals)
}

/// Check that every entry of an index buffer addresses an existing vertex
pub fn validate_indices(vertices: &[f32], indices: &[u32]) -> Result<(), GeometryError> {
    let count = vertex_count(vertices);
    match indices.iter().position(|&index| index as usize >= count) {
        Some(position) => Err(GeometryError::IndexOutOfRange {
            position,
            index: indices[position],
            vertex_count: count,
        }),
        None => Ok(()),
    }
}

/// Check that a flat attribute array divides into whole elements
pub fn validate_stride(attribute: &'static str, data: &[f32], stride: usize) -> Result<(), GeometryError> {
    if data.len() % stride == 0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidLength {
            attribute,
            len: data.len(),
            stride,
        })
    }
}

fn vertex_at(vertices: &[f32], face: usize, index: u32) -> Result<Vec3, GeometryError> {
    let start = index as usize * POSITION_COMPONENTS;
    vertices
        .get(start..start + POSITION_COMPONENTS)
        .map(Vec3::from_column_slice)
        .ok_or(GeometryError::FaceIndexOutOfRange {
            face,
            index,
            vertex_count: vertex_count(vertices),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    fn triangle() -> Vec<f32> {
        vec![
            0.0, 0.0, 0.0,
            3.0, 0.0, 0.0,
            0.0, 3.0, 0.0,
        ]
    }

    #[test]
    fn test_colors_replicated_to_cover_vertices() {
        let vertices = vec![0.0; 5 * 3];
        let pattern = vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        let mut colors = pattern.clone();

        normalize_colors(&vertices, &mut colors);

        // 5 vertices need 20 floats; the smallest multiple of 8 covering that is 24
        assert_eq!(colors.len(), 24);
        for chunk in colors.chunks(pattern.len()) {
            assert_eq!(chunk, pattern.as_slice());
        }
    }

    #[test]
    fn test_colors_long_enough_untouched() {
        let vertices = vec![0.0; 2 * 3];
        let mut colors = vec![0.5; 12];
        normalize_colors(&vertices, &mut colors);
        assert_eq!(colors.len(), 12, "colors must never be truncated");
    }

    #[test]
    fn test_colors_replication_lengths() {
        for vertices in 1..12usize {
            for colors_supplied in 1..4usize {
                let positions = vec![0.0; vertices * 3];
                let pattern: Vec<f32> = (0..colors_supplied * 4).map(|i| i as f32).collect();
                let mut colors = pattern.clone();

                normalize_colors(&positions, &mut colors);

                let c = pattern.len();
                let expected = if c >= vertices * 4 { c } else { (vertices * 4).div_ceil(c) * c };
                assert_eq!(colors.len(), expected, "N = {vertices}, C = {c}");
                assert_eq!(colors, pattern.repeat(expected / c));
            }
        }
    }

    #[test]
    fn test_colors_noop_without_vertices_or_colors() {
        let mut colors = vec![1.0, 1.0, 1.0, 1.0];
        normalize_colors(&[], &mut colors);
        assert_eq!(colors.len(), 4);

        let mut empty = Vec::new();
        normalize_colors(&triangle(), &mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_centroid_of_triangle() {
        let centroids = compute_centroids(&triangle(), &[vec![0, 1, 2]]).unwrap();
        assert_eq!(centroids.len(), 1);
        assert_relative_eq!(centroids[0], Vec3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_centroid_of_quad_uses_all_vertices() {
        let vertices = vec![
            -1.0, -1.0, 2.0,
            1.0, -1.0, 2.0,
            1.0, 1.0, 2.0,
            -1.0, 1.0, 2.0,
        ];
        let centroids = compute_centroids(&vertices, &[vec![0, 1, 2, 3], vec![0, 1, 2]]).unwrap();
        assert_relative_eq!(centroids[0], Vec3::new(0.0, 0.0, 2.0), epsilon = EPSILON);
        assert_relative_eq!(centroids[1], Vec3::new(1.0 / 3.0, -1.0 / 3.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_centroid_rejects_bad_faces() {
        assert_eq!(
            compute_centroids(&triangle(), &[vec![]]),
            Err(GeometryError::EmptyFace { face: 0 })
        );
        assert_eq!(
            compute_centroids(&triangle(), &[vec![0, 1, 2], vec![0, 3]]),
            Err(GeometryError::FaceIndexOutOfRange { face: 1, index: 3, vertex_count: 3 })
        );
    }

    #[test]
    fn test_normal_preserves_edge_formula() {
        let vertices = vec![
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
        ];
        let normals = compute_normals(&vertices, &[vec![0, 1, 2]]).unwrap();

        // dir1 = (-1, 1, 1) because its z is v3.y - v2.z; dir2 = (-1, 0, 0)
        let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(normals[0], 0.0, epsilon = EPSILON);
        assert_relative_eq!(normals[1], half_sqrt2, epsilon = EPSILON);
        assert_relative_eq!(normals[2], -half_sqrt2, epsilon = EPSILON);
    }

    #[test]
    fn test_normal_one_per_face_in_order() {
        let vertices = vec![
            0.0, 0.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ];
        let normals = compute_normals(&vertices, &[vec![0, 1, 2], vec![3, 0, 1, 2]]).unwrap();
        assert_eq!(normals.len(), 6);

        // Second face: v1 = (0,0,1), v2 = (0,0,0), v3 = (1,0,0)
        // dir1 = (1, 0, 0), dir2 = (0, 0, 1), cross = (0, 1, 0)
        assert_relative_eq!(normals[3], 0.0, epsilon = EPSILON);
        assert_relative_eq!(normals[4], 1.0, epsilon = EPSILON);
        assert_relative_eq!(normals[5], 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_tiny_normal_left_unnormalized() {
        let vertices = vec![
            0.0, 0.0, 0.0,
            1e-4, 0.0, 0.0,
            0.0, 1e-4, 0.0,
        ];
        let normals = compute_normals(&vertices, &[vec![0, 1, 2]]).unwrap();
        let normal = Vec3::from_column_slice(&normals);
        assert!(normal.norm() < NORMALIZE_EPSILON);
        assert_relative_eq!(normal, Vec3::new(0.0, 1e-8, -1e-8), epsilon = 1e-12);
    }

    #[test]
    fn test_normal_rejects_short_faces() {
        assert_eq!(
            compute_normals(&triangle(), &[vec![0, 1]]),
            Err(GeometryError::DegenerateFace { face: 0, len: 2 })
        );
        assert!(matches!(
            compute_normals(&triangle(), &[vec![0, 1, 7]]),
            Err(GeometryError::FaceIndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_validate_indices() {
        assert!(validate_indices(&triangle(), &[0, 1, 2]).is_ok());
        assert_eq!(
            validate_indices(&triangle(), &[0, 1, 2, 2, 1, 3]),
            Err(GeometryError::IndexOutOfRange { position: 5, index: 3, vertex_count: 3 })
        );
    }
}
