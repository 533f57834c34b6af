//! ModApte corpus preparation pipeline.
//!
//! The distribution is a folder of `reut2-*.sgm` files. Each file is
//! repaired and parsed lazily, the article stream is fed through corpus
//! construction, and two artifacts are written to the destination folder:
//!
//! 1. `documents.jsonl`: the filtered, renumbered corpus, one document per
//!    line.
//! 1. `dataset.csv`: the flat classification table over the top-N
//!    categories.
use std::path::PathBuf;

use itertools::Either;
use log::{debug, error, info, warn};

use crate::error::Error;
use crate::io::writer::CorpusWriter;
use crate::pipelines::pipeline::Pipeline;
use crate::processing::build_dataset;
use crate::sources::SgmlReader;

use super::types::{Corpus, RawDocument};

pub struct ModApte {
    src: PathBuf,
    dst: PathBuf,
    multiclass: bool,
    top_n: usize,
}

impl ModApte {
    pub fn new(src: PathBuf, dst: PathBuf, multiclass: bool, top_n: usize) -> Self {
        Self {
            src,
            dst,
            multiclass,
            top_n,
        }
    }

    /// List corpus files in the source folder.
    ///
    /// Unreadable directory entries are logged and skipped; anything
    /// without the `.sgm` extension is ignored. Sorted so that document
    /// order, and therefore topic numbering, is reproducible.
    fn get_paths(&self) -> Result<Vec<PathBuf>, Error> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.src)?
            .filter_map(|entry| {
                entry.map_or_else(
                    |e| {
                        error!("error reading source directory entry: {}", e);
                        None
                    },
                    Some,
                )
            })
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "sgm"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Chain the per-file readers into one lazy article stream. A file that
    /// fails to open or repair surfaces as a single fatal `Err` item.
    fn documents(paths: &[PathBuf]) -> impl Iterator<Item = Result<RawDocument, Error>> + '_ {
        paths.iter().flat_map(|path| {
            debug!("reading {:?}", path);
            match SgmlReader::from_path(path) {
                Ok(reader) => Either::Left(reader),
                Err(e) => Either::Right(std::iter::once(Err(e))),
            }
        })
    }
}

impl Pipeline<()> for ModApte {
    fn version() -> &'static str {
        "0.1.0"
    }

    fn run(&self) -> Result<(), Error> {
        let paths = self.get_paths()?;
        if paths.is_empty() {
            warn!("no .sgm files found in {:?}", self.src);
        }
        info!("working on {} corpus files", paths.len());

        let corpus = Corpus::new(Self::documents(&paths), self.multiclass)?;

        if !self.dst.exists() {
            warn!("Destination directory does not exist. Creating");
            std::fs::create_dir_all(&self.dst)?;
        }

        let docs_path = self.dst.join("documents.jsonl");
        let mut writer = CorpusWriter::from_path(&docs_path)?;
        for doc in corpus.documents() {
            writer.write(doc)?;
        }
        writer.flush()?;
        info!("wrote {} documents to {:?}", corpus.documents().len(), docs_path);

        let rows = build_dataset(&corpus, self.top_n)?;
        let dataset_path = self.dst.join("dataset.csv");
        let mut csv_writer = csv::Writer::from_path(&dataset_path)?;
        for row in &rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        info!("wrote {} dataset rows to {:?}", rows.len(), dataset_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_paths_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("reut2-001.sgm"), "").unwrap();
        std::fs::write(dir.path().join("reut2-000.sgm"), "").unwrap();
        std::fs::write(dir.path().join("all-topics.lst"), "").unwrap();

        let pipeline = ModApte::new(dir.path().to_path_buf(), dir.path().to_path_buf(), false, 10);
        let paths = pipeline.get_paths().unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["reut2-000.sgm", "reut2-001.sgm"]);
    }
}
