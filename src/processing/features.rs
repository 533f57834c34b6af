//! Text feature extraction.
//!
//! Length statistics over a text assembled from selected document columns,
//! for feature engineering on top of a written corpus.
use std::path::Path;

use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::error::Error;
use crate::io::reader::DocReader;
use crate::pipelines::modapte::types::ProcessedDocument;

/// A text-bearing document column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    Title,
    Dateline,
    Body,
}

impl TextColumn {
    fn extract<'a>(&self, doc: &'a ProcessedDocument) -> Option<&'a str> {
        match self {
            TextColumn::Title => doc.raw().title(),
            TextColumn::Dateline => doc.raw().dateline(),
            TextColumn::Body => doc.raw().body(),
        }
    }
}

/// Join the selected columns with single spaces, missing columns as empty
/// strings.
pub fn join_columns(doc: &ProcessedDocument, columns: &[TextColumn]) -> String {
    columns
        .iter()
        .map(|column| column.extract(doc).unwrap_or(""))
        .join(" ")
}

/// Length statistics over a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub chars: usize,
    pub lines: usize,
    pub sentences: usize,
    pub words: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            lines: text.matches('\n').count(),
            sentences: text.matches('.').count(),
            words: text.split_whitespace().count(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FeatureRow {
    newid: u32,
    chars: usize,
    lines: usize,
    sentences: usize,
    words: usize,
}

/// Read a JSONL corpus and write one row of length statistics per document.
///
/// Returns the number of rows written.
pub fn write_feature_csv(src: &Path, dst: &Path, columns: &[TextColumn]) -> Result<usize, Error> {
    let reader = DocReader::from_path(src)?;
    let mut writer = csv::Writer::from_path(dst)?;

    let mut count = 0usize;
    for doc in reader {
        let doc = doc?;
        let stats = TextStats::from_text(&join_columns(&doc, columns));
        writer.serialize(FeatureRow {
            newid: doc.newid()?,
            chars: stats.chars,
            lines: stats.lines,
            sentences: stats.sentences,
            words: stats.words,
        })?;
        count += 1;
    }
    writer.flush()?;
    info!("wrote {} feature rows to {:?}", count, dst);

    Ok(count)
}
