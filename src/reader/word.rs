//! DOCX (WordprocessingML) paragraph reader.

use super::ooxml::{local_name, open_archive, read_part, ElementStack};
use crate::error::{Off2TxtError, Result};
use crate::split::is_blank;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the body paragraphs of a Word document.
pub struct WordReader;

impl WordReader {
    pub fn new() -> Self {
        Self
    }

    /// Return the text of each body-level paragraph that is not blank.
    pub fn read<R: Read + Seek>(&self, reader: R, path: &Path) -> Result<Vec<String>> {
        let mut archive = open_archive(reader, path)?;
        let xml = read_part(&mut archive, path, DOCUMENT_PART)?;
        parse_document_xml(&xml)
    }
}

impl Default for WordReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A paragraph is body-level when it is the only open `p` and sits directly
/// under `body`; table cells and text boxes nest it deeper.
fn in_body_paragraph(stack: &ElementStack) -> bool {
    stack.count(b"p") == 1 && stack.has_pair(b"body", b"p")
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack = ElementStack::default();
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(e.name().as_ref());
                if stack.last_is(b"p") && in_body_paragraph(&stack) {
                    current.clear();
                }
            }
            Ok(Event::Empty(ref e)) => {
                if in_body_paragraph(&stack) && stack.last_is(b"r") {
                    match local_name(e.name().as_ref()) {
                        b"tab" => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if stack.last_is(b"t") && in_body_paragraph(&stack) {
                    let text = e.unescape().map_err(|err| Off2TxtError::xml(DOCUMENT_PART, err))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if stack.last_is(b"p") && in_body_paragraph(&stack) {
                    let text = std::mem::take(&mut current);
                    if !is_blank(&text) {
                        paragraphs.push(text);
                    }
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Off2TxtError::xml(DOCUMENT_PART, e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ooxml::test_support::build_archive;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_body_paragraphs() {
        let xml = document(
            r#"<w:p><w:r><w:t>First</w:t></w:r><w:r><w:t xml:space="preserve"> paragraph</w:t></w:r></w:p>
<w:p><w:r><w:t>Café &amp; crème</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["First paragraph", "Café & crème"]);
    }

    #[test]
    fn test_blank_paragraphs_are_skipped_but_content_is_untrimmed() {
        let xml = document(
            r#"<w:p/><w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">  indented</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["  indented"]);
    }

    #[test]
    fn test_tabs_and_breaks() {
        let xml = document(
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["a\tb\nc"]);
    }

    #[test]
    fn test_hyperlink_runs_are_included() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">see </w:t></w:r><w:hyperlink><w:r><w:t>here</w:t></w:r></w:hyperlink></w:p>"#,
        );
        assert_eq!(parse_document_xml(&xml).unwrap(), vec!["see here"]);
    }

    #[test]
    fn test_tables_and_deleted_text_are_skipped() {
        let xml = document(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>in a cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:r><w:t>kept</w:t></w:r><w:del><w:r><w:delText>gone</w:delText></w:r></w:del></w:p>"#,
        );
        assert_eq!(parse_document_xml(&xml).unwrap(), vec!["kept"]);
    }

    #[test]
    fn test_text_box_paragraphs_are_not_body_level() {
        let xml = document(
            r#"<w:p><w:r><w:t>outer</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>boxed</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>"#,
        );
        assert_eq!(parse_document_xml(&xml).unwrap(), vec!["outer"]);
    }

    #[test]
    fn test_read_from_archive() {
        let xml = document(r#"<w:p><w:r><w:t>Hello</w:t></w:r></w:p>"#);
        let archive = build_archive(&[("word/document.xml", xml.as_str())]);
        let paragraphs = WordReader::new()
            .read(archive, Path::new("hello.docx"))
            .unwrap();
        assert_eq!(paragraphs, vec!["Hello"]);
    }

    #[test]
    fn test_missing_document_part() {
        let archive = build_archive(&[("word/styles.xml", "<w:styles/>")]);
        let result = WordReader::new().read(archive, Path::new("broken.docx"));
        assert!(matches!(result, Err(Off2TxtError::Archive { .. })));
    }
}
