use std::collections::BTreeMap;

use facet_common::Real;
use nalgebra::Matrix4;

use crate::{AttributeUsage, BufferHandle, PipelineError};

/// The method by which indexed vertices are interpreted as topological primitives.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Triangles,
}

/// Matrix uniforms understood by every shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UniformSlot {
    ModelView,
    Projection,
}

/// The buffers a drawable uploaded when it was attached, and how to draw them.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    attributes: BTreeMap<AttributeUsage, BufferHandle>,
    indices: BufferHandle,
    count: usize,
    mode: Mode,
}

impl Binding {
    /// Upload each attribute buffer and the index buffer to `pipeline`.
    ///
    /// `count` is taken to be the full length of `indices`.
    pub fn upload<'data, P: Pipeline>(
        pipeline: &mut P,
        attributes: impl IntoIterator<Item = (AttributeUsage, &'data [Real])>,
        indices: &[u32],
        mode: Mode,
    ) -> Result<Self, PipelineError> {
        let attributes = attributes
            .into_iter()
            .map(|(usage, data)| Ok((usage, pipeline.upload_attribute(usage, data)?)))
            .collect::<Result<BTreeMap<_, _>, PipelineError>>()?;
        Ok(Self {
            attributes,
            indices: pipeline.upload_indices(indices)?,
            count: indices.len(),
            mode,
        })
    }

    #[inline]
    pub fn attribute(&self, usage: AttributeUsage) -> Option<BufferHandle> {
        self.attributes.get(&usage).copied()
    }

    /// Attribute buffers, in [AttributeUsage] order.
    pub fn attributes(&self) -> impl Iterator<Item = (AttributeUsage, BufferHandle)> + '_ {
        self.attributes.iter().map(|(u, h)| (*u, *h))
    }

    #[inline]
    pub fn indices(&self) -> BufferHandle {
        self.indices
    }

    /// Number of indices drawn per call.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// A rendering context.
///
/// Every boundary call takes the pipeline explicitly; implementations own whatever GPU
/// resources their handles refer to.
pub trait Pipeline {
    /// Register a float attribute buffer, with a stride of `usage.components()`.
    fn upload_attribute(
        &mut self,
        usage: AttributeUsage,
        data: &[Real],
    ) -> Result<BufferHandle, PipelineError>;

    /// Register a triangle index buffer for indexed draw calls.
    fn upload_indices(&mut self, indices: &[u32]) -> Result<BufferHandle, PipelineError>;

    fn set_uniform(&mut self, slot: UniformSlot, matrix: &Matrix4<Real>);

    fn draw_indexed(&mut self, binding: &Binding) -> Result<(), PipelineError>;
}

/// Something which can upload its buffers once and then be drawn every frame.
pub trait Drawable {
    /// Upload buffers to `pipeline`. Called once, not per frame.
    fn attach<P: Pipeline>(&mut self, pipeline: &mut P) -> Result<(), PipelineError>;

    /// Set the model-view uniform and issue the draw call.
    ///
    /// # Errors
    ///
    /// * [`NotAttached`](PipelineError::NotAttached) if [attach](Drawable::attach) was never called.
    fn render<P: Pipeline>(&self, pipeline: &mut P) -> Result<(), PipelineError>;
}
