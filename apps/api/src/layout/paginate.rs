//! Places wrapped text lines onto pages.
//!
//! Each source line becomes one multi-line cell spanning the text width. A
//! line that would cross the page-break trigger starts a new page at the top
//! margin.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::{to_latin1_lossy, FontMetricTable, PageGeometry};

/// A printed line with its position. Coordinates are in mm from the page's
/// top-left corner; `baseline_mm` is where the glyphs sit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub page: usize,
    pub x_mm: f32,
    pub baseline_mm: f32,
    pub text: String,
}

/// Lays out `text` (split on `\n`) and returns the placed lines, page by page.
///
/// Always returns at least one page, even for empty input.
pub fn paginate(text: &str, metrics: &FontMetricTable, geometry: &PageGeometry) -> Vec<Vec<PlacedLine>> {
    let max_width_em = geometry.text_width_em();
    let x_mm = geometry.margin_left_mm + geometry.cell_padding_mm;
    // Glyphs are vertically centred in the cell.
    let baseline_offset = 0.5 * geometry.line_height_mm + 0.3 * geometry.font_size_mm();

    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut cursor_mm = geometry.margin_top_mm;

    for source_line in text.split('\n') {
        let source_line = to_latin1_lossy(source_line);
        for printed in metrics.wrap_line(&source_line, max_width_em) {
            if cursor_mm + geometry.line_height_mm > geometry.page_break_trigger_mm() {
                pages.push(Vec::new());
                cursor_mm = geometry.margin_top_mm;
            }
            let page = pages.len() - 1;
            pages[page].push(PlacedLine {
                page,
                x_mm,
                baseline_mm: cursor_mm + baseline_offset,
                text: printed,
            });
            cursor_mm += geometry.line_height_mm;
        }
    }

    pages
}
