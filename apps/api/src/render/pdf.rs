//! PDF projection: one wrapped cell per line of the rendered text, plain
//! Helvetica throughout.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use crate::layout::{paginate, PageGeometry, HELVETICA};
use crate::render::template::Document;
use crate::render::ExportError;

const PDF_TITLE: &str = "POC Scoping Document";
const LAYER_NAME: &str = "Text";

/// Builds the PDF download for a rendered document.
pub fn export_pdf(document: &Document) -> Result<Vec<u8>, ExportError> {
    let geometry = PageGeometry::a4();
    let text = document.text();
    let pages = paginate(text.trim(), &HELVETICA, &geometry);

    let width = Mm(geometry.page_width_mm);
    let height = Mm(geometry.page_height_mm);
    let (pdf, first_page, first_layer) = PdfDocument::new(PDF_TITLE, width, height, LAYER_NAME);
    let font = pdf
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = pdf.add_page(width, height, LAYER_NAME);
            pdf.get_page(page).get_layer(layer)
        };

        for line in lines.iter().filter(|l| !l.text.is_empty()) {
            // printpdf measures y from the bottom edge.
            layer.use_text(
                line.text.clone(),
                geometry.font_size_pt,
                Mm(line.x_mm),
                Mm(geometry.page_height_mm - line.baseline_mm),
                &font,
            );
        }
    }

    debug!("PDF export laid out {} page(s)", pages.len());

    pdf.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}
