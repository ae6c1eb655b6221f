use std::collections::{BTreeMap, HashMap};

use facet_common::Real;
use nalgebra::Matrix4;

use crate::{
    AttributeUsage, Binding, Buffer, BufferHandle, BufferType, Mode, Pipeline, PipelineError,
    UniformSlot,
};

/// A draw call observed by a [RecordingPipeline].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mode: Mode,
    pub count: usize,
    pub attributes: Vec<AttributeUsage>,
    /// The model-view uniform at the time of the draw.
    pub model_view: Option<Matrix4<Real>>,
    /// The projection uniform at the time of the draw.
    pub projection: Option<Matrix4<Real>>,
}

/// A [Pipeline] which keeps everything it is given in memory.
///
/// Buffers stay alive until [released](RecordingPipeline::release).
#[derive(Debug, Default)]
pub struct RecordingPipeline {
    buffers: BTreeMap<BufferHandle, Buffer>,
    next_handle: u32,
    uniforms: HashMap<UniformSlot, Matrix4<Real>>,
    draws: Vec<DrawRecord>,
}

impl RecordingPipeline {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, buffer: Buffer) -> BufferHandle {
        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        tracing::debug!(
            handle = handle.0,
            ty = ?buffer.ty(),
            component = ?buffer.component(),
            len = buffer.len(),
            bytes = buffer.as_bytes().len(),
            "uploaded buffer"
        );
        self.buffers.insert(handle, buffer);
        handle
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&Buffer> {
        self.buffers.get(&handle)
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn uniform(&self, slot: UniformSlot) -> Option<&Matrix4<Real>> {
        self.uniforms.get(&slot)
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Forget recorded draw calls, e.g. at the start of a frame.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    /// Free a buffer, returning its contents.
    pub fn release(&mut self, handle: BufferHandle) -> Option<Buffer> {
        self.buffers.remove(&handle)
    }

    /// Free every buffer referenced by `binding`.
    pub fn release_binding(&mut self, binding: &Binding) {
        for (_, handle) in binding.attributes() {
            self.release(handle);
        }
        self.release(binding.indices());
    }

    fn buffer_checked(&self, handle: BufferHandle) -> Result<&Buffer, PipelineError> {
        self.buffers
            .get(&handle)
            .ok_or(PipelineError::UnknownBuffer(handle))
    }
}

impl Pipeline for RecordingPipeline {
    fn upload_attribute(
        &mut self,
        usage: AttributeUsage,
        data: &[Real],
    ) -> Result<BufferHandle, PipelineError> {
        let components = usage.components();
        if data.len() % components != 0 {
            return Err(PipelineError::AttributeLength {
                usage,
                len: data.len(),
                components,
            });
        }
        Ok(self.insert(Buffer::from_floats(data)))
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<BufferHandle, PipelineError> {
        Ok(self.insert(Buffer::from_indices(indices)))
    }

    fn set_uniform(&mut self, slot: UniformSlot, matrix: &Matrix4<Real>) {
        self.uniforms.insert(slot, *matrix);
    }

    fn draw_indexed(&mut self, binding: &Binding) -> Result<(), PipelineError> {
        for (_, handle) in binding.attributes() {
            let buf = self.buffer_checked(handle)?;
            if buf.ty() != BufferType::Array {
                return Err(PipelineError::WrongBufferType(handle, buf.ty()));
            }
        }
        let indices = self.buffer_checked(binding.indices())?;
        if indices.ty() != BufferType::ElementArray {
            return Err(PipelineError::WrongBufferType(
                binding.indices(),
                indices.ty(),
            ));
        }
        if binding.count() > indices.len() {
            return Err(PipelineError::IndexCount {
                count: binding.count(),
                len: indices.len(),
            });
        }
        tracing::trace!(count = binding.count(), mode = ?binding.mode(), "draw");
        self.draws.push(DrawRecord {
            mode: binding.mode(),
            count: binding.count(),
            attributes: binding.attributes().map(|(u, _)| u).collect(),
            model_view: self.uniforms.get(&UniformSlot::ModelView).copied(),
            projection: self.uniforms.get(&UniformSlot::Projection).copied(),
        });
        Ok(())
    }
}
