//! DOCX body walk using docx-rs.

use super::ExtractionError;
use docx_rs::{Break, BreakType, DocumentChild, Paragraph, ParagraphChild, Run, RunChild};

/// Read the raw text of every top-level body paragraph, in document order.
///
/// Tables, headers and footers are not part of the paragraph sequence.
pub(super) fn read_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|error| ExtractionError::Parse(error.to_string()))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, &mut text),
            ParagraphChild::Hyperlink(link) => {
                for child in &link.children {
                    if let ParagraphChild::Run(run) = child {
                        push_run_text(run, &mut text);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run_text(run: &Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            // Page and column breaks carry no text; only line breaks do.
            RunChild::Break(br) if *br == Break::new(BreakType::TextWrapping) => text.push('\n'),
            RunChild::CarriageReturn(_) => text.push('\n'),
            _ => {}
        }
    }
}
