//! Word-processor (`.docx`) text: body paragraphs first, then every table
//! row with its cells joined by `" | "`.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::warn;

type DocxResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub fn extract_text(bytes: &[u8]) -> String {
    match read_document_xml(bytes).and_then(|xml| linearize(&xml)) {
        Ok(text) => text,
        Err(e) => {
            warn!("DOCX extraction failed: {e}");
            String::new()
        }
    }
}

fn read_document_xml(bytes: &[u8]) -> DocxResult<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

fn linearize(xml: &str) -> DocxResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut rows: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut paragraph = String::new();
    let mut cell = String::new();
    let mut cells: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tr" if table_depth == 1 => cells.clear(),
                b"w:tc" if table_depth == 1 => cell.clear(),
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br" | b"w:cr") {
                    paragraph.push(' ');
                }
            }
            Event::Text(t) if in_text => paragraph.push_str(&t.unescape()?),
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" if table_depth == 0 => paragraphs.push(std::mem::take(&mut paragraph)),
                b"w:p" => {
                    if !cell.is_empty() {
                        cell.push('\n');
                    }
                    cell.push_str(&std::mem::take(&mut paragraph));
                }
                b"w:tc" if table_depth == 1 => cells.push(std::mem::take(&mut cell)),
                b"w:tr" if table_depth == 1 => rows.push(cells.join(" | ")),
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.extend(rows);
    Ok(paragraphs.join("\n"))
}
