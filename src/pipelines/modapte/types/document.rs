use std::collections::HashMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;

use super::ProvisionalTopics;

/// One parsed article, exactly as it appears in the distribution.
///
/// Immutable once yielded by the parser; annotation produces a
/// [ProcessedDocument] instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    attrs: HashMap<String, String>,
    date: Option<String>,
    title: Option<String>,
    dateline: Option<String>,
    body: Option<String>,
    topics: Vec<String>,
}

impl RawDocument {
    pub fn new(
        attrs: HashMap<String, String>,
        date: Option<String>,
        title: Option<String>,
        dateline: Option<String>,
        body: Option<String>,
        topics: Vec<String>,
    ) -> Self {
        Self {
            attrs,
            date,
            title,
            dateline,
            body,
            topics,
        }
    }

    /// Get a reference to the article-level attribute set.
    pub fn attrs(&self) -> &HashMap<String, String> {
        &self.attrs
    }

    /// Raw date string, verbatim from the `DATE` element.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn dateline(&self) -> Option<&str> {
        self.dateline.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Topic names in document order. May be empty.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

/// ModApte split membership, derived from the `LEWISSPLIT` and `TOPICS`
/// attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
    Unused,
}

impl Split {
    /// A missing attribute is a corpus-integrity violation, not something
    /// to paper over.
    fn from_attrs(attrs: &HashMap<String, String>) -> Result<Self, Error> {
        let split = attrs
            .get("LEWISSPLIT")
            .ok_or_else(|| Error::MissingAttribute("LEWISSPLIT".to_string()))?;
        let has_topics = attrs
            .get("TOPICS")
            .ok_or_else(|| Error::MissingAttribute("TOPICS".to_string()))?;

        Ok(match (split.as_str(), has_topics.as_str()) {
            ("TRAIN", "YES") => Split::Train,
            ("TEST", "YES") => Split::Test,
            _ => Split::Unused,
        })
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Test => write!(f, "test"),
            Split::Unused => write!(f, "unused"),
        }
    }
}

/// A [RawDocument] augmented with the derived text, split and category ids.
///
/// `cats` holds provisional ids until [Corpus](super::Corpus) construction
/// rewrites them against the final [TopicTable](super::TopicTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDocument {
    #[serde(flatten)]
    raw: RawDocument,
    text: String,
    modapte: Split,
    cats: Vec<u32>,
}

impl ProcessedDocument {
    /// Annotate a parsed article: composite text, split membership,
    /// provisional category ids, in that order.
    pub fn annotate(raw: RawDocument, topics: &mut ProvisionalTopics) -> Result<Self, Error> {
        let text = compose_text(&raw);
        let modapte = Split::from_attrs(raw.attrs())?;
        let cats = topics.assign(raw.topics());

        Ok(Self {
            raw,
            text,
            modapte,
            cats,
        })
    }

    /// Get a reference to the underlying raw article.
    pub fn raw(&self) -> &RawDocument {
        &self.raw
    }

    /// Composite text: title, then dateline, then body.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn modapte(&self) -> Split {
        self.modapte
    }

    /// Category ids. Provisional until the corpus renumbering pass.
    pub fn cats(&self) -> &[u32] {
        &self.cats
    }

    /// Numeric article id from the `NEWID` attribute.
    pub fn newid(&self) -> Result<u32, Error> {
        let raw = self
            .raw
            .attrs()
            .get("NEWID")
            .ok_or_else(|| Error::MissingAttribute("NEWID".to_string()))?;
        raw.parse()
            .map_err(|e| Error::Custom(format!("non-numeric NEWID {:?}: {}", raw, e)))
    }

    pub(crate) fn retain_cats(&mut self, valid: &HashSet<u32>) {
        self.cats.retain(|cat| valid.contains(cat));
    }

    pub(crate) fn set_cats(&mut self, cats: Vec<u32>) {
        self.cats = cats;
    }
}

/// Join title, dateline and body with single spaces, missing fields as
/// empty strings, outer whitespace trimmed.
fn compose_text(raw: &RawDocument) -> String {
    let tail = format!(
        "{} {}",
        raw.dateline().unwrap_or(""),
        raw.body().unwrap_or("")
    );
    format!("{} {}", raw.title().unwrap_or(""), tail)
        .trim()
        .to_string()
}
