use docqa_core::types::DocumentKind;
use docqa_text::{extract, extract_bytes, preview, supported_parsers};
use std::io::{Cursor, Write};
use tempfile::tempdir;

fn docx_bytes(document_xml: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .expect("start entry");
    writer.write_all(document_xml.as_bytes()).expect("write entry");
    writer.finish().expect("finish zip").into_inner()
}

#[test]
fn text_file_is_whitespace_normalized() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "Payment   terms\n\n are 30 days.\t").expect("write");

    let out = extract(&path);
    assert_eq!(out.kind, DocumentKind::Text);
    assert_eq!(out.text, "Payment terms are 30 days.");
}

#[test]
fn zero_byte_file_yields_empty_text() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, b"").expect("write");

    let out = extract(&path);
    assert!(out.is_empty());
}

#[test]
fn missing_file_yields_empty_text() {
    let dir = tempdir().expect("tempdir");
    let out = extract(&dir.path().join("absent.pdf"));
    assert_eq!(out.kind, DocumentKind::Pdf);
    assert!(out.is_empty());
}

#[test]
fn unknown_extension_is_read_as_text() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("README.rst");
    std::fs::write(&path, "Install with make.").expect("write");

    let out = extract(&path);
    assert_eq!(out.kind, DocumentKind::Text);
    assert_eq!(out.text, "Install with make.");
}

#[test]
fn semicolon_csv_is_canonicalized() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("prices.CSV");
    std::fs::write(&path, "item;price\nbolt;0,10\nnut;0,05\n").expect("write");

    let out = extract(&path);
    assert_eq!(out.kind, DocumentKind::Tabular);
    assert_eq!(out.text, "item,price bolt,\"0,10\" nut,\"0,05\"");
}

#[test]
fn windows_1251_text_is_decoded() {
    // "Привет" in Windows-1251.
    let bytes = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
    let out = extract_bytes(&bytes, DocumentKind::Text);
    assert_eq!(out.text, "Привет");
}

#[test]
fn docx_paragraphs_and_tables() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>Warranty covers two years.</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Part</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Months</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
</w:body></w:document>"#;
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("warranty.docx");
    std::fs::write(&path, docx_bytes(xml)).expect("write");

    let out = extract(&path);
    assert_eq!(out.kind, DocumentKind::Docx);
    assert_eq!(out.text, "Warranty covers two years. Part | Months");
}

#[test]
fn corrupt_binary_formats_fail_closed() {
    assert!(extract_bytes(b"%PDF-1.4 truncated", DocumentKind::Pdf).is_empty());
    assert!(extract_bytes(b"PK\x03\x04garbage", DocumentKind::Docx).is_empty());
}

#[test]
fn preview_drops_invalid_bytes() {
    let mut bytes = vec![0xff, 0xfe];
    bytes.extend(std::iter::repeat(b'a').take(300));
    let p = preview(&bytes, 200);
    assert_eq!(p.len(), 198);
    assert!(p.chars().all(|c| c == 'a'));
}

#[test]
fn every_kind_has_a_parser() {
    let kinds: Vec<_> = supported_parsers().into_iter().map(|(k, _)| k).collect();
    for kind in [DocumentKind::Text, DocumentKind::Tabular, DocumentKind::Pdf, DocumentKind::Docx] {
        assert!(kinds.contains(&kind));
    }
}

/// A one-page PDF showing `line` in Helvetica, with a correct xref table.
fn pdf_bytes(line: &str) -> Vec<u8> {
    let content = format!("BT /F1 18 Tf 72 720 Td ({line}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
    ];
    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }
    let xref_at = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!("trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n", objects.len() + 1).as_bytes(),
    );
    pdf
}

#[test]
fn pdf_text_is_extracted() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("invoice.pdf");
    std::fs::write(&path, pdf_bytes("Invoice payable within thirty days")).expect("write");

    let out = extract(&path);
    assert_eq!(out.kind, DocumentKind::Pdf);
    assert!(out.text.contains("Invoice"), "got {:?}", out.text);
    assert!(out.text.contains("thirty"), "got {:?}", out.text);
    assert!(!out.text.contains('\n'));
}

#[test]
fn tabular_with_invalid_utf8_falls_back_to_raw_bytes() {
    let out = extract_bytes(b"name,city\n\xff\xfeOslo,Bergen\n", DocumentKind::Tabular);
    assert_eq!(out.text, "name,city Oslo,Bergen");
}

#[test]
fn text_fallback_never_resurrects_empty_input() {
    assert!(extract_bytes(b"", DocumentKind::Tabular).is_empty());
    assert!(extract_bytes(b" \n\t ", DocumentKind::Text).is_empty());
}
