/*! JSONL corpus writer.
 * !*/
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::pipelines::modapte::types::ProcessedDocument;

/// Line-oriented document writer, generic over the underlying writer type.
pub struct DocWriter<W>
where
    W: Write,
{
    writer: BufWriter<W>,
}

pub type CorpusWriter = DocWriter<File>;

impl CorpusWriter {
    pub fn from_path(dst: &Path) -> Result<Self, Error> {
        let handle = File::create(dst)?;
        Ok(Self::new(handle))
    }
}

impl<W> DocWriter<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Write one document as a single JSON line.
    pub fn write(&mut self, doc: &ProcessedDocument) -> Result<(), Error> {
        serde_json::to_writer(&mut self.writer, doc)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }
}
