//! The boundary between facet geometry and whatever draws it.
//!
//! Geometry crates never talk to a graphics API directly. They hand flat attribute and index
//! buffers to a [Pipeline], which is always passed in explicitly; there is no ambient rendering
//! context. [RecordingPipeline] is an in-memory implementation, useful for headless drivers and
//! tests.

mod attribute;
pub use attribute::*;

mod buffer;
pub use buffer::*;

mod draw;
pub use draw::*;

mod error;
pub use error::*;

mod projection;
pub use projection::*;

mod recording;
pub use recording::*;
