pub mod source_index;

pub use source_index::SourceIndex;
