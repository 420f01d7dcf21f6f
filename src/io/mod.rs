//! File boundaries of the pipeline: the line-oriented [`RecordSource`] and
//! the line-atomic [`Sink`].

mod sink;
mod source;

pub use sink::Sink;
pub use source::RecordSource;
