/*! JSONL corpus reader.
 * !*/
use std::fs::File;
use std::io::{BufRead, Lines, Read};

use std::io::BufReader;
use std::path::Path;

use crate::error::Error;
use crate::pipelines::modapte::types::ProcessedDocument;

/// Line-oriented document reader, generic over the underlying reader type.
#[derive(Debug)]
pub struct Reader<T>
where
    T: Read,
{
    lines: Lines<BufReader<T>>,
}

pub type DocReader = Reader<File>;

impl DocReader {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let handle = File::open(src)?;
        let br = BufReader::new(handle);
        let lines = br.lines();
        Ok(Self { lines })
    }
}

impl<T> Reader<T>
where
    T: Read,
{
    pub fn new(reader: T) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }
}

impl<T> Iterator for Reader<T>
where
    T: Read,
{
    type Item = Result<ProcessedDocument, Error>;

    /// iterates over corpus entries, skipping blank lines
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str::<ProcessedDocument>(&line).map_err(Error::Serde));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn gen_data() -> String {
        let doc = r#"{
            "attrs":{"LEWISSPLIT":"TRAIN","TOPICS":"YES","NEWID":"1"},
            "date":"26-FEB-1987 15:01:01.79",
            "title":"a title",
            "dateline":null,
            "body":"a body",
            "topics":["grain"],
            "text":"a title  a body",
            "modapte":"train",
            "cats":[1]
        }"#;

        let doc_no_newline: String = doc
            .lines()
            .map(|line| line.trim_matches(char::is_whitespace))
            .collect();
        let mut ret = String::new();
        for _ in 0..10 {
            ret.push_str(&doc_no_newline);
            ret.push('\n');
        }
        ret
    }

    #[test]
    fn test_first() {
        let mut reader = Reader::new(Cursor::new(gen_data()));
        let doc = reader.next().unwrap().unwrap();
        assert_eq!(doc.newid().unwrap(), 1);
        assert_eq!(doc.cats(), [1]);
    }

    #[test]
    fn test_all() {
        let reader = Reader::new(Cursor::new(gen_data()));
        let docs: Vec<_> = reader.collect();
        assert_eq!(docs.len(), 10);
        for doc in docs {
            assert!(doc.is_ok());
        }
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut data = gen_data();
        data.push('\n');
        data.push('\n');
        let reader = Reader::new(Cursor::new(data));
        assert_eq!(reader.count(), 10);
    }

    #[test]
    fn test_garbage_line_is_error() {
        let reader = Reader::new(Cursor::new("not json\n".to_string()));
        let items: Vec<_> = reader.collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}
