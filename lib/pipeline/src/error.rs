use crate::{AttributeUsage, BufferHandle, BufferType};

/// Errors raised at the rendering boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{usage:?} buffer holds {len} floats, which is not a multiple of its {components} components")]
    AttributeLength {
        usage: AttributeUsage,
        len: usize,
        components: usize,
    },
    #[error("no buffer with handle {0:?}")]
    UnknownBuffer(BufferHandle),
    #[error("buffer {0:?} is a {1:?} buffer, which cannot be used here")]
    WrongBufferType(BufferHandle, BufferType),
    #[error("draw of {count} indices exceeds index buffer of length {len}")]
    IndexCount { count: usize, len: usize },
    #[error("attempted to render a drawable which was never attached to a pipeline")]
    NotAttached,
}
