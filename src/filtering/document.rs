//! Document-level filtering.
use super::Filter;
use crate::pipelines::modapte::types::ProcessedDocument;

/// Keeps documents that carry exactly one category.
///
/// Used by the optional multiclass mode, which turns the corpus into a
/// single-label classification problem before cross-split filtering runs.
#[derive(Debug, Default)]
pub struct SingleLabel;

impl Filter<&ProcessedDocument> for SingleLabel {
    fn detect(&self, doc: &ProcessedDocument) -> bool {
        doc.cats().len() == 1
    }
}
