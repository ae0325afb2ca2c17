//! Word projection: one paragraph per blank-line-delimited block of the
//! rendered text, in template order.

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run};

use crate::render::template::{Document, SECTION_SEPARATOR};
use crate::render::ExportError;

/// Splits the rendered text into Word paragraphs.
///
/// Headings and bodies land in separate paragraphs, and an empty field
/// leaves an empty paragraph behind it.
pub fn word_paragraphs(document: &Document) -> Vec<String> {
    document
        .text()
        .trim()
        .split(SECTION_SEPARATOR)
        .map(str::to_string)
        .collect()
}

fn paragraph_for(block: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in block.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

/// Builds the `.docx` download for a rendered document.
pub fn export_docx(document: &Document) -> Result<Vec<u8>, ExportError> {
    let docx = word_paragraphs(document)
        .iter()
        .fold(Docx::new(), |docx, block| docx.add_paragraph(paragraph_for(block)));

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fields::FieldSet;
    use crate::render::template::render;

    #[test]
    fn test_paragraphs_follow_blank_line_blocks() {
        let fields = FieldSet {
            desired_outcomes: "Reduce latency by 30%".to_string(),
            company_background: "Acme Corp, founded 2010".to_string(),
            key_contacts: "Jane Doe, CTO".to_string(),
            ..FieldSet::default()
        };
        let paragraphs = word_paragraphs(&render(&fields));
        assert_eq!(
            &paragraphs[..4],
            &[
                "1. Executive Summary",
                "Reduce latency by 30%",
                "2. Company Background",
                "Acme Corp, founded 2010",
            ]
        );
        assert_eq!(paragraphs.last().map(String::as_str), Some("Jane Doe, CTO"));
    }

    #[test]
    fn test_empty_fields_leave_empty_paragraphs() {
        let paragraphs = word_paragraphs(&render(&FieldSet::default()));
        // Seven heading + empty-body pairs, then the final heading (trailing blank trimmed).
        assert_eq!(paragraphs.len(), 15);
        assert_eq!(paragraphs[0], "1. Executive Summary");
        assert_eq!(paragraphs[1], "");
        assert_eq!(paragraphs[14], "8. POV Team");
    }

    #[test]
    fn test_blank_lines_inside_a_field_split_paragraphs() {
        let fields = FieldSet {
            timeline: "Phase 1: discovery\n\nPhase 2: build".to_string(),
            ..FieldSet::default()
        };
        let paragraphs = word_paragraphs(&render(&fields));
        assert!(paragraphs.contains(&"Phase 1: discovery".to_string()));
        assert!(paragraphs.contains(&"Phase 2: build".to_string()));
    }

    #[test]
    fn test_export_docx_is_a_zip_package() {
        let bytes = export_docx(&render(&FieldSet::default())).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
