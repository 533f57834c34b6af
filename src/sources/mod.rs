/*! Corpus sources.

Reading of the raw Reuters-21578 distribution files.
!*/
pub mod sgml;

pub use sgml::{cleanup_sgml, SgmlReader};
