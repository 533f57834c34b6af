/*! Filtering utilities

Filters operate on document level and implement [filter::Filter]:
a pure filter, where two successive equal inputs yield two equal outputs.
!*/
mod document;
mod filter;

pub use document::SingleLabel;
pub use filter::Filter;
