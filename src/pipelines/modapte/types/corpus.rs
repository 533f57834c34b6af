//! ModApte corpus construction.
//!
//! Consumes the lazy article stream and runs the phases in strict order:
//! annotate, drop unused, optional multiclass filter, cross-split category
//! filter, dense renumbering. Each phase's output is the next phase's input;
//! the cross-split filter needs global visibility, so the filtered set is
//! materialized in memory.
use std::collections::HashSet;

use log::{debug, info};

use crate::error::Error;
use crate::filtering::{Filter, SingleLabel};

use super::{ProcessedDocument, ProvisionalTopics, RawDocument, Split, TopicTable};

/// The filtered, renumbered document set plus the final topic table.
#[derive(Debug)]
pub struct Corpus {
    docs: Vec<ProcessedDocument>,
    topics: TopicTable,
}

impl Corpus {
    /// Build a corpus from a raw article stream.
    ///
    /// Parse errors from the stream are fatal and propagate unchanged. With
    /// `multiclass` set, only documents carrying exactly one category before
    /// cross-split filtering are retained.
    pub fn new<I>(raw: I, multiclass: bool) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Result<RawDocument, Error>>,
    {
        let mut provisional = ProvisionalTopics::default();
        let mut docs = Vec::new();
        let mut total = 0usize;

        for doc in raw {
            total += 1;
            let doc = ProcessedDocument::annotate(doc?, &mut provisional)?;
            if doc.modapte() != Split::Unused {
                docs.push(doc);
            }
        }
        info!("{}/{} documents in the modapte split", docs.len(), total);

        if multiclass {
            let filter = SingleLabel::default();
            docs.retain(|doc| filter.detect(doc));
            info!("{} documents with a single label", docs.len());
        }

        let docs = Self::filter_cross_split(docs);
        info!("{} documents after cross-split filtering", docs.len());

        let (docs, topics) = Self::renumber(docs, &provisional)?;
        debug!("final topic table holds {} topics", topics.len());

        Ok(Self { docs, topics })
    }

    /// Get a reference to the surviving documents, in input order.
    pub fn documents(&self) -> &[ProcessedDocument] {
        &self.docs
    }

    /// Get a reference to the final topic table.
    pub fn topics(&self) -> &TopicTable {
        &self.topics
    }

    /// Keep only categories observed in at least one train document and at
    /// least one test document, then drop documents left without any.
    ///
    /// A category missing from either side cannot be both learned and
    /// evaluated. Idempotent: running it on its own output changes nothing.
    fn filter_cross_split(docs: Vec<ProcessedDocument>) -> Vec<ProcessedDocument> {
        let mut train = HashSet::new();
        let mut test = HashSet::new();
        for doc in &docs {
            match doc.modapte() {
                Split::Train => train.extend(doc.cats().iter().copied()),
                Split::Test => test.extend(doc.cats().iter().copied()),
                Split::Unused => {}
            }
        }
        let valid: HashSet<u32> = train.intersection(&test).copied().collect();
        debug!("{} categories present in both splits", valid.len());

        let mut kept = Vec::with_capacity(docs.len());
        for mut doc in docs {
            doc.retain_cats(&valid);
            if !doc.cats().is_empty() {
                kept.push(doc);
            }
        }
        kept
    }

    /// Rebuild the topic table from the surviving documents and rewrite
    /// every category list with the new dense ids.
    ///
    /// Only the categories that survived filtering are mapped; provisional
    /// ids are resolved through their names and never reused as-is.
    fn renumber(
        mut docs: Vec<ProcessedDocument>,
        provisional: &ProvisionalTopics,
    ) -> Result<(Vec<ProcessedDocument>, TopicTable), Error> {
        let mut topics = TopicTable::default();
        for doc in &mut docs {
            let cats = doc
                .cats()
                .iter()
                .map(|id| {
                    provisional
                        .name(*id)
                        .map(|name| topics.id_or_insert(name))
                        .ok_or_else(|| {
                            Error::Custom(format!("unknown provisional category id {}", id))
                        })
                })
                .collect::<Result<Vec<u32>, Error>>()?;
            doc.set_cats(cats);
        }
        Ok((docs, topics))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn raw_doc(split: &str, has_topics: &str, newid: u32, topics: &[&str]) -> RawDocument {
        let attrs: HashMap<String, String> = vec![
            ("LEWISSPLIT".to_string(), split.to_string()),
            ("TOPICS".to_string(), has_topics.to_string()),
            ("NEWID".to_string(), newid.to_string()),
        ]
        .into_iter()
        .collect();

        RawDocument::new(
            attrs,
            Some("26-FEB-1987 15:01:01.79".to_string()),
            Some(format!("title {}", newid)),
            None,
            Some(format!("body {}", newid)),
            topics.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn ok(doc: RawDocument) -> Result<RawDocument, Error> {
        Ok(doc)
    }

    #[test]
    fn test_grain_in_both_splits() {
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain"])),
                ok(raw_doc("TEST", "YES", 2, &["grain"])),
            ],
            false,
        )
        .unwrap();

        assert_eq!(corpus.documents().len(), 2);
        assert_eq!(corpus.topics().len(), 1);
        assert_eq!(corpus.topics().id("grain"), Some(1));
        for doc in corpus.documents() {
            assert_eq!(doc.cats(), [1]);
        }
    }

    #[test]
    fn test_train_only_category_dropped() {
        // no test document ever mentions oilseed
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain"])),
                ok(raw_doc("TEST", "YES", 2, &["grain"])),
                ok(raw_doc("TRAIN", "YES", 3, &["oilseed"])),
            ],
            false,
        )
        .unwrap();

        assert_eq!(corpus.documents().len(), 2);
        assert_eq!(corpus.topics().id("oilseed"), None);
    }

    #[test]
    fn test_unused_documents_dropped() {
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain"])),
                ok(raw_doc("TEST", "YES", 2, &["grain"])),
                ok(raw_doc("NOT-USED", "YES", 3, &["grain"])),
                ok(raw_doc("TRAIN", "NO", 4, &["grain"])),
            ],
            false,
        )
        .unwrap();

        assert_eq!(corpus.documents().len(), 2);
    }

    #[test]
    fn test_multiclass_drops_multi_label_documents() {
        // [grain, wheat] goes away before cross-split filtering runs, so
        // wheat ends up train-only and is dropped from the table too
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain", "wheat"])),
                ok(raw_doc("TRAIN", "YES", 2, &["grain"])),
                ok(raw_doc("TEST", "YES", 3, &["grain"])),
                ok(raw_doc("TEST", "YES", 4, &["wheat"])),
            ],
            true,
        )
        .unwrap();

        let ids: Vec<u32> = corpus.documents().iter().map(|d| d.newid().unwrap()).collect();
        assert_eq!(ids, [2, 3]);
        assert_eq!(corpus.topics().names(), ["grain"]);
    }

    #[test]
    fn test_renumbering_is_dense_and_first_seen() {
        // provisional: acq=1, oilseed=2, grain=3, wheat=4; oilseed is
        // train-only and disappears, the rest shift down without gaps
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["acq", "oilseed"])),
                ok(raw_doc("TRAIN", "YES", 2, &["grain", "wheat"])),
                ok(raw_doc("TEST", "YES", 3, &["acq", "grain", "wheat"])),
            ],
            false,
        )
        .unwrap();

        assert_eq!(corpus.topics().names(), ["acq", "grain", "wheat"]);
        assert_eq!(corpus.documents()[0].cats(), [1]);
        assert_eq!(corpus.documents()[1].cats(), [2, 3]);
        assert_eq!(corpus.documents()[2].cats(), [1, 2, 3]);
    }

    #[test]
    fn test_output_invariants() {
        let corpus = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain", "corn"])),
                ok(raw_doc("TEST", "YES", 2, &["corn"])),
                ok(raw_doc("TRAIN", "YES", 3, &["ship"])),
                ok(raw_doc("TEST", "YES", 4, &["ship", "crude"])),
                ok(raw_doc("NOT-USED", "NO", 5, &["crude"])),
            ],
            false,
        )
        .unwrap();

        let n = corpus.topics().len() as u32;
        for doc in corpus.documents() {
            assert_ne!(doc.modapte(), Split::Unused);
            assert!(!doc.cats().is_empty());
            for cat in doc.cats() {
                assert!(*cat >= 1 && *cat <= n);
                assert!(corpus.topics().name(*cat).is_some());
            }
        }
        // dense: every id in 1..=n resolves to a name
        for id in 1..=n {
            assert!(corpus.topics().name(id).is_some());
        }
    }

    #[test]
    fn test_cross_split_filter_idempotent() {
        let mut provisional = ProvisionalTopics::default();
        let docs: Vec<ProcessedDocument> = vec![
            raw_doc("TRAIN", "YES", 1, &["grain", "oilseed"]),
            raw_doc("TEST", "YES", 2, &["grain"]),
            raw_doc("TRAIN", "YES", 3, &["oilseed"]),
        ]
        .into_iter()
        .map(|raw| ProcessedDocument::annotate(raw, &mut provisional).unwrap())
        .collect();

        let once = Corpus::filter_cross_split(docs);
        let twice = Corpus::filter_cross_split(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_error_propagates() {
        let result = Corpus::new(
            vec![
                ok(raw_doc("TRAIN", "YES", 1, &["grain"])),
                Err(Error::Custom("broken stream".to_string())),
            ],
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_stream() {
        let corpus = Corpus::new(Vec::new(), false).unwrap();
        assert!(corpus.documents().is_empty());
        assert!(corpus.topics().is_empty());
    }
}
