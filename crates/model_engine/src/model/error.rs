//! Geometry errors

use thiserror::Error;

/// Errors raised while constructing, deriving or materializing model geometry
///
/// Missing optional attributes are never an error; these variants cover
/// malformed data that would otherwise read out of bounds or produce
/// undefined output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A flat attribute array does not divide into whole elements
    #[error("{attribute} length {len} is not a multiple of {stride}")]
    InvalidLength {
        /// Attribute name
        attribute: &'static str,
        /// Actual array length
        len: usize,
        /// Required component stride
        stride: usize,
    },

    /// A face references a vertex that does not exist
    #[error("face {face} references vertex {index}, but the model only has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Face position in `faces`
        face: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the model
        vertex_count: usize,
    },

    /// An entry of the index buffer references a vertex that does not exist
    #[error("index {position} references vertex {index}, but the model only has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Position in `indices`
        position: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the model
        vertex_count: usize,
    },

    /// A face with no vertices has no centroid
    #[error("face {face} is empty")]
    EmptyFace {
        /// Face position in `faces`
        face: usize,
    },

    /// A face needs at least three vertices to define a normal
    #[error("face {face} has {len} vertices; a normal needs at least 3")]
    DegenerateFace {
        /// Face position in `faces`
        face: usize,
        /// Number of vertices in the face
        len: usize,
    },

    /// A vertex index does not fit the 16-bit index buffer format
    #[error("index {index} does not fit in a 16-bit index buffer")]
    IndexOverflow {
        /// Offending index
        index: u32,
    },

    /// A parametric surface needs at least one segment along each axis
    #[error("tessellation needs at least one segment per axis (nlat = {nlat}, nlong = {nlong})")]
    InvalidTessellation {
        /// Segments along the latitude parameter
        nlat: u32,
        /// Segments along the longitude parameter
        nlong: u32,
    },
}
