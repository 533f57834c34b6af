/*! ModApte corpus types.

[RawDocument] is what the parser yields; [ProcessedDocument] adds the
derived fields; [Corpus] is the filtered, renumbered result together with
the final [TopicTable].
!*/
mod corpus;
mod document;
mod topics;

pub use corpus::Corpus;
pub use document::{ProcessedDocument, RawDocument, Split};
pub use topics::{ProvisionalTopics, TopicTable};
