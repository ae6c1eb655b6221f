use facet_common::Real;

/// What a vertex attribute buffer means to the shader consuming it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeUsage {
    Position,
    Normal,
    /// `normal + position`, for shaders which draw normals as line segments from each vertex.
    ///
    /// This is never uploaded in place of [Normal](AttributeUsage::Normal).
    NormalVisual,
    Color,
    Texcoord,
}

impl AttributeUsage {
    pub const fn attr_type(self) -> AttributeType {
        match self {
            Self::Position | Self::Normal | Self::NormalVisual => AttributeType::Vec3,
            Self::Color => AttributeType::Vec4,
            Self::Texcoord => AttributeType::Vec2,
        }
    }

    /// Number of floats per vertex; the stride handed to the attribute sink.
    #[inline]
    pub const fn components(self) -> usize {
        self.attr_type().size_elements()
    }
}

/// The inner components of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U32,
    F32,
}

impl AttributeComponent {
    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            AttributeComponent::U32 => align_of::<u32>(),
            AttributeComponent::F32 => align_of::<f32>(),
        }
    }

    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }
}

// attribute buffers are uploaded as F32, whatever `Real` is aliased to
static_assertions::const_assert_eq!(std::mem::size_of::<Real>(), AttributeComponent::F32.size());
static_assertions::const_assert_eq!(
    std::mem::align_of::<Real>(),
    AttributeComponent::F32.alignment()
);

/// The shape of a single attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_vertex_layout() {
        assert_eq!(AttributeUsage::Position.components(), 3);
        assert_eq!(AttributeUsage::Normal.components(), 3);
        assert_eq!(AttributeUsage::NormalVisual.components(), 3);
        assert_eq!(AttributeUsage::Color.components(), 4);
        assert_eq!(AttributeUsage::Texcoord.components(), 2);
        assert_eq!(AttributeUsage::Color.attr_type(), AttributeType::Vec4);
    }
}
