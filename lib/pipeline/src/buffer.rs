use facet_common::Real;

use crate::AttributeComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    Array,
    ElementArray,
}

/// Opaque name of a buffer owned by a [Pipeline](crate::Pipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    Float(Vec<Real>),
    Index(Vec<u32>),
}

/// A data blob which has been handed to a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    data: BufferData,
}

impl Buffer {
    #[inline]
    pub fn from_floats(data: &[Real]) -> Self {
        Self {
            data: BufferData::Float(data.to_vec()),
        }
    }

    #[inline]
    pub fn from_indices(data: &[u32]) -> Self {
        Self {
            data: BufferData::Index(data.to_vec()),
        }
    }

    pub fn ty(&self) -> BufferType {
        match self.data {
            BufferData::Float(_) => BufferType::Array,
            BufferData::Index(_) => BufferType::ElementArray,
        }
    }

    pub fn component(&self) -> AttributeComponent {
        match self.data {
            BufferData::Float(_) => AttributeComponent::F32,
            BufferData::Index(_) => AttributeComponent::U32,
        }
    }

    /// Number of components (not bytes) stored.
    pub fn len(&self) -> usize {
        match &self.data {
            BufferData::Float(v) => v.len(),
            BufferData::Index(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn floats(&self) -> Option<&[Real]> {
        match &self.data {
            BufferData::Float(v) => Some(v),
            BufferData::Index(_) => None,
        }
    }

    pub fn indices(&self) -> Option<&[u32]> {
        match &self.data {
            BufferData::Index(v) => Some(v),
            BufferData::Float(_) => None,
        }
    }

    /// The raw bytes as they would be sent to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.data {
            BufferData::Float(v) => bytemuck::cast_slice(v),
            BufferData::Index(v) => bytemuck::cast_slice(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_view_matches_component_size() {
        let b = Buffer::from_floats(&[0.0, 1.0, 2.0]);
        assert_eq!(b.ty(), BufferType::Array);
        assert_eq!(b.as_bytes().len(), 3 * b.component().size());

        let i = Buffer::from_indices(&[0, 1, 2, 2, 3, 0]);
        assert_eq!(i.ty(), BufferType::ElementArray);
        assert_eq!(i.component(), AttributeComponent::U32);
        assert_eq!(i.as_bytes().len(), 6 * i.component().size());
        assert_eq!(i.indices(), Some(&[0, 1, 2, 2, 3, 0][..]));
        assert!(i.floats().is_none());
    }
}
