// Renderer: field set → eight-section document → Word / PDF downloads.
// Export buffers are built synchronously in memory and never persisted.

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod template;

pub use template::{render, Document, Section};

/// A downloadable projection of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Docx => "POC_Scoping_Document.docx",
            ExportFormat::Pdf => "POC_Scoping_Document.pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("DOCX packaging failed: {0}")]
    Docx(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
