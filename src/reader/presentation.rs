//! PPTX (PresentationML) paragraph reader.

use super::ooxml::{local_name, open_archive, read_optional_part, read_part, ElementStack};
use crate::error::{Off2TxtError, Result};
use crate::split::is_blank;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_RELATIONSHIP_SUFFIX: &str = "/relationships/slide";

/// Reads the text-frame paragraphs of every slide, in presentation order.
pub struct PresentationReader;

impl PresentationReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read<R: Read + Seek>(&self, reader: R, path: &Path) -> Result<Vec<String>> {
        let mut archive = open_archive(reader, path)?;
        let slide_parts = self.get_slide_order(&mut archive, path)?;
        log::debug!("{}: {} slides", path.display(), slide_parts.len());

        let mut paragraphs = Vec::new();
        for part in &slide_parts {
            let xml = read_part(&mut archive, path, part)?;
            paragraphs.extend(parse_slide_xml(&xml, part)?);
        }

        Ok(paragraphs)
    }

    /// Slide part names in the order given by `p:sldIdLst`, falling back to
    /// the numbering of the slide parts when the list cannot be resolved.
    fn get_slide_order<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &Path,
    ) -> Result<Vec<String>> {
        let relationships = match read_optional_part(archive, path, PRESENTATION_RELS_PART)? {
            Some(xml) => parse_slide_relationships(&xml)?,
            None => HashMap::new(),
        };

        let slide_ids = match read_optional_part(archive, path, PRESENTATION_PART)? {
            Some(xml) => parse_slide_id_list(&xml)?,
            None => Vec::new(),
        };

        let ordered: Vec<String> = slide_ids
            .iter()
            .filter_map(|id| relationships.get(id))
            .cloned()
            .collect();

        if !ordered.is_empty() {
            return Ok(ordered);
        }

        let mut numbered: Vec<(usize, String)> = archive
            .file_names()
            .filter(|name| name.starts_with("ppt/slides/slide") && name.ends_with(".xml"))
            .filter_map(|name| extract_slide_number(name).map(|n| (n, name.to_string())))
            .collect();
        numbered.sort();

        Ok(numbered.into_iter().map(|(_, name)| name).collect())
    }
}

impl Default for PresentationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Map relationship ids to slide part names.
fn parse_slide_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut slides = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let rel_type = attribute(e, b"Type").unwrap_or_default();
                if !rel_type.ends_with(SLIDE_RELATIONSHIP_SUFFIX) {
                    continue;
                }
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    slides.insert(id, resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Off2TxtError::xml(PRESENTATION_RELS_PART, e)),
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of `p:sldId` entries, in document order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // the relationship id is the namespaced `r:id`, not the numeric `id`
                let rel_id = e.attributes().flatten().find(|attr| {
                    attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id"
                });
                if let Some(attr) = rel_id {
                    ids.push(String::from_utf8_lossy(&attr.value).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Off2TxtError::xml(PRESENTATION_PART, e)),
            _ => {}
        }
    }

    Ok(ids)
}

fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// Only top-level shapes (`p:sp` directly under `p:spTree`) carry text
/// frames; grouped shapes and graphic frames are skipped.
fn in_shape_paragraph(stack: &ElementStack) -> bool {
    stack.has_pair(b"spTree", b"sp") && stack.has_pair(b"txBody", b"p")
}

fn parse_slide_xml(xml: &str, part: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack = ElementStack::default();
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(e.name().as_ref());
                if in_shape_paragraph(&stack) {
                    if stack.last_is(b"p") {
                        current.clear();
                    } else if stack.last_is(b"br") {
                        current.push('\n');
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if in_shape_paragraph(&stack)
                    && stack.last_is(b"p")
                    && local_name(e.name().as_ref()) == b"br"
                {
                    current.push('\n');
                }
            }
            Ok(Event::Text(ref e)) => {
                if stack.last_is(b"t") && in_shape_paragraph(&stack) {
                    let text = e.unescape().map_err(|err| Off2TxtError::xml(part, err))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if stack.last_is(b"p") && in_shape_paragraph(&stack) {
                    let text = std::mem::take(&mut current);
                    if !is_blank(&text) {
                        paragraphs.push(text);
                    }
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Off2TxtError::xml(part, e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Extract a slide number from a part name like "ppt/slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ooxml::test_support::build_archive;

    const NS: &str = r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

    fn slide(shapes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><p:sld {}><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            NS, shapes
        )
    }

    fn text_shape(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>", body)
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("ppt/slides/slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_slide_paragraphs() {
        let xml = slide(&text_shape(&["Title", "", "Bullet ü"]));
        let paragraphs = parse_slide_xml(&xml, "ppt/slides/slide1.xml").unwrap();
        assert_eq!(paragraphs, vec!["Title", "Bullet ü"]);
    }

    #[test]
    fn test_line_break_inside_paragraph() {
        let xml = slide(
            "<p:sp><p:txBody><a:p><a:r><a:t>one</a:t></a:r><a:br><a:rPr/></a:br><a:r><a:t>two</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let paragraphs = parse_slide_xml(&xml, "slide").unwrap();
        assert_eq!(paragraphs, vec!["one\ntwo"]);
    }

    #[test]
    fn test_grouped_shapes_and_tables_are_skipped() {
        let shapes = format!(
            "<p:grpSp>{}</p:grpSp><p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr><a:tc><a:txBody><a:p><a:r><a:t>cell</a:t></a:r></a:p></a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>{}",
            text_shape(&["grouped"]),
            text_shape(&["top level"])
        );
        let paragraphs = parse_slide_xml(&slide(&shapes), "slide").unwrap();
        assert_eq!(paragraphs, vec!["top level"]);
    }

    #[test]
    fn test_slide_order_follows_presentation_list() {
        let presentation = format!(
            r#"<p:presentation {}><p:sldIdLst><p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst></p:presentation>"#,
            NS
        );
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="/ppt/slides/slide2.xml"/>
</Relationships>"#;
        let slide1 = slide(&text_shape(&["from slide one"]));
        let slide2 = slide(&text_shape(&["from slide two"]));

        let archive = build_archive(&[
            ("ppt/presentation.xml", presentation.as_str()),
            ("ppt/_rels/presentation.xml.rels", rels),
            ("ppt/slides/slide1.xml", slide1.as_str()),
            ("ppt/slides/slide2.xml", slide2.as_str()),
        ]);

        let paragraphs = PresentationReader::new()
            .read(archive, Path::new("deck.pptx"))
            .unwrap();
        assert_eq!(paragraphs, vec!["from slide two", "from slide one"]);
    }

    #[test]
    fn test_slide_order_falls_back_to_part_numbers() {
        let slide2 = slide(&text_shape(&["second"]));
        let slide10 = slide(&text_shape(&["tenth"]));
        let archive = build_archive(&[
            ("ppt/slides/slide10.xml", slide10.as_str()),
            ("ppt/slides/slide2.xml", slide2.as_str()),
        ]);

        let paragraphs = PresentationReader::new()
            .read(archive, Path::new("deck.pptx"))
            .unwrap();
        assert_eq!(paragraphs, vec!["second", "tenth"]);
    }
}
