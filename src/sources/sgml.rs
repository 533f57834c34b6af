//! Reuters-21578 SGML reading.
//!
//! The distribution files are not well-formed markup: they carry a handful of
//! corrupt byte sequences (control-character references and one stray Latin-1
//! byte), a DOCTYPE line referencing a DTD that is not shipped, and no single
//! root element. [cleanup_sgml] repairs all of that at the byte level, after
//! which the file parses as regular XML.
//!
//! [SgmlReader] then streams over the repaired buffer and yields one
//! [RawDocument] per closed `REUTERS` element, so peak memory stays bounded
//! by a single article.
use std::collections::HashMap;
use std::io::{BufRead, Cursor};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Error;
use crate::pipelines::modapte::types::RawDocument;

/// Byte sequences that appear in the distribution but are not valid in the
/// target encoding. The list is deliberately closed: anything else is a
/// parse error, not something to auto-heal.
const BROKEN: [&[u8]; 10] = [
    b"&#1;", b"&#2;", b"&#3;", b"\xfc", b"&#5;", b"&#22;", b"&#27;", b"&#30;", b"&#31;",
    b"&#127;",
];

const DOCTYPE_LINE: &[u8] = br#"<!DOCTYPE lewis SYSTEM "lewis.dtd">"#;
const ROOT_OPEN: &[u8] = b"<document>";
const ROOT_CLOSE: &[u8] = b"</document>";

/// Repair a raw corpus file so that it becomes one well-formed root element.
///
/// Strips the known-bad byte sequences, swaps the malformed DOCTYPE line for
/// a synthetic `<document>` wrapper and appends the matching close tag. Runs
/// before any decoding: the corruptions would otherwise fail UTF-8
/// validation.
pub fn cleanup_sgml(raw: &[u8]) -> Vec<u8> {
    let mut repaired = raw.to_vec();
    for pattern in BROKEN {
        repaired = replace_bytes(&repaired, pattern, b"");
    }
    repaired = replace_bytes(&repaired, DOCTYPE_LINE, ROOT_OPEN);
    repaired.extend_from_slice(ROOT_CLOSE);
    repaired
}

fn replace_bytes(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

/// Lazy article reader, generic over the underlying reader type.
///
/// Iterating yields one [RawDocument] per `REUTERS` element. Structural
/// malformation outside the repaired set is fatal and surfaces as an `Err`
/// item.
pub struct SgmlReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl SgmlReader<Cursor<Vec<u8>>> {
    /// Read, repair and decode a corpus file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let raw = std::fs::read(path)?;
        Self::from_bytes(&raw)
    }

    /// Repair and decode an in-memory corpus file.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, Error> {
        let repaired = cleanup_sgml(raw);
        // decoding failures outside the repaired set are fatal
        let text = String::from_utf8(repaired)?;
        Ok(Self::new(Cursor::new(text.into_bytes())))
    }
}

impl<R: BufRead> SgmlReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
        }
    }

    /// Read the children of a `REUTERS` element until it closes.
    fn read_document(&mut self, start: &BytesStart<'static>) -> Result<RawDocument, Error> {
        let attrs = Self::read_attributes(start)?;
        let mut topics = Vec::new();
        let mut date = None;
        let mut title = None;
        let mut dateline = None;
        let mut body = None;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let e = e.into_owned();
                    match e.name().as_ref() {
                        b"TOPICS" => topics = self.read_topics()?,
                        b"DATE" => date = self.read_text(b"DATE")?,
                        b"TEXT" => {
                            self.read_text_section(&mut title, &mut dateline, &mut body)?
                        }
                        // PLACES, PEOPLE, ORGS, EXCHANGES, COMPANIES, ...
                        _ => self.skip(&e)?,
                    }
                }
                Event::End(e) if e.name().as_ref() == b"REUTERS" => break,
                Event::Eof => {
                    return Err(Error::Custom(
                        "unexpected end of file inside a REUTERS element".to_string(),
                    ))
                }
                _ => {}
            }
        }

        Ok(RawDocument::new(attrs, date, title, dateline, body, topics))
    }

    fn read_attributes(start: &BytesStart) -> Result<HashMap<String, String>, Error> {
        let mut attrs = HashMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.unescape_value()?.into_owned();
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    /// Topic name elements, in document order. An empty element yields an
    /// empty string.
    fn read_topics(&mut self) -> Result<Vec<String>, Error> {
        let mut topics = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let e = e.into_owned();
                    let text = self.read_text(e.name().as_ref())?;
                    topics.push(text.unwrap_or_default());
                }
                Event::Empty(_) => topics.push(String::new()),
                Event::End(e) if e.name().as_ref() == b"TOPICS" => break,
                Event::Eof => {
                    return Err(Error::Custom(
                        "unexpected end of file inside a TOPICS element".to_string(),
                    ))
                }
                _ => {}
            }
        }
        Ok(topics)
    }

    /// Scan a `TEXT` element for its title/dateline/body subtags.
    ///
    /// Tag names are matched case-insensitively and only the first
    /// occurrence of each tag is kept; duplicates are consumed and
    /// discarded. Unknown subtags are skipped wholesale.
    fn read_text_section(
        &mut self,
        title: &mut Option<String>,
        dateline: &mut Option<String>,
        body: &mut Option<String>,
    ) -> Result<(), Error> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let e = e.into_owned();
                    let slot = match e.name().as_ref().to_ascii_lowercase().as_slice() {
                        b"title" => Some(&mut *title),
                        b"dateline" => Some(&mut *dateline),
                        b"body" => Some(&mut *body),
                        _ => None,
                    };
                    match slot {
                        Some(slot) => {
                            let content = self.read_text(e.name().as_ref())?;
                            if slot.is_none() {
                                *slot = content;
                            }
                        }
                        None => self.skip(&e)?,
                    }
                }
                Event::End(e) if e.name().as_ref() == b"TEXT" => break,
                Event::Eof => {
                    return Err(Error::Custom(
                        "unexpected end of file inside a TEXT element".to_string(),
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Collect unescaped text until the named end tag.
    fn read_text(&mut self, end: &[u8]) -> Result<Option<String>, Error> {
        let mut content: Option<String> = None;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf)? {
                Event::Text(t) => {
                    let text = t.unescape()?;
                    match &mut content {
                        Some(c) => c.push_str(&text),
                        None => content = Some(text.into_owned()),
                    }
                }
                Event::End(e) if e.name().as_ref() == end => break,
                Event::Eof => {
                    return Err(Error::Custom(format!(
                        "unexpected end of file inside a {} element",
                        String::from_utf8_lossy(end)
                    )))
                }
                _ => {}
            }
        }
        Ok(content)
    }

    /// Skip a whole subtree.
    fn skip(&mut self, start: &BytesStart<'static>) -> Result<(), Error> {
        let mut buf = Vec::new();
        self.reader.read_to_end_into(start.to_end().name(), &mut buf)?;
        Ok(())
    }
}

impl<R: BufRead> Iterator for SgmlReader<R> {
    type Item = Result<RawDocument, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) if e.name().as_ref() == b"REUTERS" => {
                    let e = e.into_owned();
                    return Some(self.read_document(&e));
                }
                Ok(Event::Eof) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(Error::Xml(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<!DOCTYPE lewis SYSTEM "lewis.dtd">
<REUTERS TOPICS="YES" LEWISSPLIT="TRAIN" CGISPLIT="TRAINING-SET" OLDID="5544" NEWID="1">
<DATE>26-FEB-1987 15:01:01.79</DATE>
<TOPICS><D>grain</D><D>wheat</D></TOPICS>
<PLACES><D>usa</D></PLACES>
<PEOPLE></PEOPLE>
<ORGS></ORGS>
<EXCHANGES></EXCHANGES>
<COMPANIES></COMPANIES>
<UNKNOWN>unparsed header material</UNKNOWN>
<TEXT>
<TITLE>GRAIN STOCKS SEEN RISING</TITLE>
<DATELINE>    WASHINGTON, Feb 26 - </DATELINE><BODY>U.S. grain stocks rose
sharply, traders said.
 Reuter
</BODY></TEXT>
</REUTERS>
<REUTERS TOPICS="NO" LEWISSPLIT="TEST" CGISPLIT="TRAINING-SET" OLDID="5545" NEWID="2">
<DATE>26-FEB-1987 15:02:20.00</DATE>
<TOPICS></TOPICS>
<TEXT TYPE="UNPROC">
raw unprocessed text with no subtags
</TEXT>
</REUTERS>
"#;

    #[test]
    fn test_cleanup_passthrough() {
        // free of bad sequences: only the wrapper substitution and the
        // appended close tag may differ
        let raw = SAMPLE.as_bytes();
        let repaired = cleanup_sgml(raw);

        let mut expected = SAMPLE
            .replace(
                r#"<!DOCTYPE lewis SYSTEM "lewis.dtd">"#,
                "<document>",
            )
            .into_bytes();
        expected.extend_from_slice(b"</document>");

        assert_eq!(repaired, expected);
    }

    #[test]
    fn test_cleanup_strips_broken_sequences() {
        let raw: Vec<u8> = [
            b"prefix &#3;mid".as_ref(),
            b"\xfc".as_ref(),
            b"dle&#127; suffix".as_ref(),
        ]
        .concat();

        let repaired = cleanup_sgml(&raw);
        let mut expected = b"prefix middle suffix".to_vec();
        expected.extend_from_slice(b"</document>");
        assert_eq!(repaired, expected);
    }

    #[test]
    fn test_parse_fields() {
        let mut reader = SgmlReader::from_bytes(SAMPLE.as_bytes()).unwrap();

        let doc = reader.next().unwrap().unwrap();
        assert_eq!(doc.attrs().get("LEWISSPLIT").unwrap(), "TRAIN");
        assert_eq!(doc.attrs().get("TOPICS").unwrap(), "YES");
        assert_eq!(doc.attrs().get("NEWID").unwrap(), "1");
        assert_eq!(doc.date().unwrap(), "26-FEB-1987 15:01:01.79");
        assert_eq!(doc.topics(), ["grain", "wheat"]);
        assert_eq!(doc.title().unwrap(), "GRAIN STOCKS SEEN RISING");
        assert_eq!(doc.dateline().unwrap(), "    WASHINGTON, Feb 26 - ");
        assert!(doc.body().unwrap().starts_with("U.S. grain stocks rose"));

        let doc = reader.next().unwrap().unwrap();
        assert_eq!(doc.attrs().get("LEWISSPLIT").unwrap(), "TEST");
        assert!(doc.topics().is_empty());
        // TYPE="UNPROC" text has no subtags
        assert!(doc.title().is_none());
        assert!(doc.dateline().is_none());
        assert!(doc.body().is_none());

        assert!(reader.next().is_none());
    }

    #[test]
    fn test_duplicate_subtag_ignored() {
        let sample = r#"<!DOCTYPE lewis SYSTEM "lewis.dtd">
<REUTERS TOPICS="YES" LEWISSPLIT="TRAIN" NEWID="3">
<TOPICS><D>corn</D></TOPICS>
<TEXT>
<TITLE>FIRST TITLE</TITLE>
<TITLE>SECOND TITLE</TITLE>
</TEXT>
</REUTERS>
"#;
        let mut reader = SgmlReader::from_bytes(sample.as_bytes()).unwrap();
        let doc = reader.next().unwrap().unwrap();
        assert_eq!(doc.title().unwrap(), "FIRST TITLE");
    }

    #[test]
    fn test_entities_unescaped() {
        let sample = r#"<!DOCTYPE lewis SYSTEM "lewis.dtd">
<REUTERS TOPICS="YES" LEWISSPLIT="TRAIN" NEWID="4">
<TOPICS><D>acq</D></TOPICS>
<TEXT>
<TITLE>A &amp; B &lt;CORP&gt;</TITLE>
</TEXT>
</REUTERS>
"#;
        let mut reader = SgmlReader::from_bytes(sample.as_bytes()).unwrap();
        let doc = reader.next().unwrap().unwrap();
        assert_eq!(doc.title().unwrap(), "A & B <CORP>");
    }

    #[test]
    fn test_malformed_nesting_is_fatal() {
        let sample = r#"<!DOCTYPE lewis SYSTEM "lewis.dtd">
<REUTERS TOPICS="YES" LEWISSPLIT="TRAIN" NEWID="5">
<TOPICS><D>corn</TOPICS></D>
</REUTERS>
"#;
        let mut reader = SgmlReader::from_bytes(sample.as_bytes()).unwrap();
        assert!(reader.next().unwrap().is_err());
    }
}
