// PDF text layout: static glyph metrics, greedy line wrapping and page breaking.
// Pure and synchronous; the PDF writer only places the lines computed here.

pub mod font_metrics;
pub mod paginate;

pub use font_metrics::{PageGeometry, HELVETICA};
pub use paginate::paginate;
