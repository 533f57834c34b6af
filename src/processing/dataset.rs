//! Flat dataset assembly.
//!
//! Turns a [Corpus] into one row per document for direct consumption by a
//! classifier: the top-N most frequent categories are selected, each
//! document gets a single label among them, and the raw date string is
//! parsed into a timestamp plus a weekday name.
use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::error::Error;
use crate::pipelines::modapte::types::{Corpus, ProcessedDocument};

const DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// One dataset row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub modapte: String,
    pub category: String,
    pub label: usize,
    pub date: NaiveDateTime,
    pub title: Option<String>,
    pub dateline: Option<String>,
    pub body: Option<String>,
    pub newid: u32,
    pub weekday_name: String,
}

/// Build the flat table for the `top_n` most frequent categories.
///
/// Documents whose label falls outside the selection are excluded; label
/// ids are dense, 0-based positions in the frequency ranking.
pub fn build_dataset(corpus: &Corpus, top_n: usize) -> Result<Vec<Row>, Error> {
    let ranked = rank_categories(corpus.documents());
    let top: Vec<u32> = ranked.into_iter().take(top_n).collect();
    let labels: HashMap<u32, usize> = top.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let top_set: HashSet<u32> = top.into_iter().collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for doc in corpus.documents() {
        let newid = doc.newid()?;
        let category = pick_category(doc.cats(), &top_set);
        let label = match labels.get(&category) {
            Some(label) => *label,
            None => {
                skipped += 1;
                continue;
            }
        };
        let name = corpus.topics().name(category).ok_or_else(|| {
            Error::Custom(format!("category id {} missing from the topic table", category))
        })?;
        let date = parse_date(
            doc.raw()
                .date()
                .ok_or_else(|| Error::Custom(format!("document {} has no date", newid)))?,
        )?;

        rows.push(Row {
            modapte: doc.modapte().to_string(),
            category: name.to_string(),
            label,
            weekday_name: date.format("%A").to_string(),
            date,
            title: doc.raw().title().map(str::to_string),
            dateline: doc.raw().dateline().map(str::to_string),
            body: doc.raw().body().map(str::to_string),
            newid,
        });
    }
    debug!("{} documents outside the top-{} categories", skipped, top_n);

    Ok(rows)
}

/// Category ids ranked by document count, highest count first, ties broken
/// by the higher id.
fn rank_categories(docs: &[ProcessedDocument]) -> Vec<u32> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for doc in docs {
        for cat in doc.cats() {
            *counts.entry(*cat).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| (b.1, b.0).cmp(&(a.1, a.0)))
        .map(|(id, _)| id)
        .collect()
}

/// A document's label: its first category, overridden by the last category
/// in its list that belongs to the selection.
fn pick_category(cats: &[u32], top: &HashSet<u32>) -> u32 {
    let mut label = cats[0];
    for cat in cats {
        if top.contains(cat) {
            label = *cat;
        }
    }
    label
}

/// Parse a raw corpus date, discarding the trailing fractional component.
///
/// The distribution uses `26-FEB-1987 15:01:01.79`-style strings.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, Error> {
    let trimmed = raw.trim();
    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    Ok(NaiveDateTime::parse_from_str(stem, DATE_FORMAT)?)
}
