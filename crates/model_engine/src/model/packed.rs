//! GPU-ready packed attribute arrays
//!
//! Float attributes (positions, normals, colors, texture coordinates) are
//! packed as contiguous 32-bit floats and index buffers as contiguous 16-bit
//! unsigned integers. Conversion is pure; the packed copy owns its data.

use super::error::GeometryError;

/// Element format of a packed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackedFormat {
    /// 32-bit IEEE float
    Float32,
    /// 16-bit unsigned integer
    Uint16,
}

impl PackedFormat {
    /// Size of a single element in bytes
    pub const fn element_size(self) -> usize {
        match self {
            Self::Float32 => std::mem::size_of::<f32>(),
            Self::Uint16 => std::mem::size_of::<u16>(),
        }
    }
}

/// A contiguous, GPU-ready copy of one attribute array
#[derive(Debug, Clone, PartialEq)]
pub enum PackedData {
    /// Packed 32-bit floats
    Float32(Vec<f32>),
    /// Packed 16-bit indices
    Uint16(Vec<u16>),
}

impl PackedData {
    /// Pack a flat float attribute
    pub fn from_f32(values: &[f32]) -> Self {
        Self::Float32(values.to_vec())
    }

    /// Pack an index array into 16-bit indices
    ///
    /// Fails on the first index that does not fit in `u16`.
    pub fn from_indices(indices: &[u32]) -> Result<Self, GeometryError> {
        indices
            .iter()
            .map(|&index| u16::try_from(index).map_err(|_| GeometryError::IndexOverflow { index }))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Uint16)
    }

    /// Element format
    pub const fn format(&self) -> PackedFormat {
        match self {
            Self::Float32(_) => PackedFormat::Float32,
            Self::Uint16(_) => PackedFormat::Uint16,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            Self::Float32(values) => values.len(),
            Self::Uint16(values) => values.len(),
        }
    }

    /// True when the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes in native endianness, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Float32(values) => bytemuck::cast_slice(values),
            Self::Uint16(values) => bytemuck::cast_slice(values),
        }
    }

    /// Size of the packed buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.len() * self.format().element_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_packing_preserves_values() {
        let packed = PackedData::from_f32(&[1.0, -2.5, 3.25]);
        assert_eq!(packed.format(), PackedFormat::Float32);
        assert_eq!(packed.len(), 3);
        assert_eq!(packed.byte_len(), 12);
        assert_eq!(packed.as_bytes().len(), 12);
        assert_eq!(&packed.as_bytes()[0..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn test_index_packing() {
        let packed = PackedData::from_indices(&[0, 1, 65535]).unwrap();
        assert_eq!(packed, PackedData::Uint16(vec![0, 1, 65535]));
        assert_eq!(packed.as_bytes().len(), 6);
    }

    #[test]
    fn test_index_overflow_rejected() {
        assert_eq!(
            PackedData::from_indices(&[0, 70000]),
            Err(GeometryError::IndexOverflow { index: 70000 })
        );
    }
}
