/*! Corpus post-processing.

Operations over an already built [Corpus](crate::pipelines::modapte::types::Corpus):
flat dataset assembly and text feature extraction.
!*/
pub mod dataset;
pub mod features;

pub use dataset::{build_dataset, Row};
pub use features::{write_feature_csv, TextColumn, TextStats};
