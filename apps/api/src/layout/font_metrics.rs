//! Static glyph-width table for PDF line wrapping.
//!
//! Widths are in em units (relative to font size), taken from the standard
//! Helvetica AFM metrics, which is also what PDF viewers substitute for Arial.
//! The table covers ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Page and text-cell parameters for the PDF export, all lengths in mm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_top_mm: f32,
    pub margin_right_mm: f32,
    /// Auto page-break trigger distance from the bottom edge.
    pub margin_bottom_mm: f32,
    /// Inner padding on each side of a text cell.
    pub cell_padding_mm: f32,
    pub font_size_pt: f32,
    pub line_height_mm: f32,
}

impl PageGeometry {
    /// A4 portrait, 10 mm side/top margins, 15 mm page-break margin,
    /// 12 pt text on 10 mm lines.
    pub fn a4() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_left_mm: 10.0,
            margin_top_mm: 10.0,
            margin_right_mm: 10.0,
            margin_bottom_mm: 15.0,
            cell_padding_mm: 1.0,
            font_size_pt: 12.0,
            line_height_mm: 10.0,
        }
    }

    pub fn font_size_mm(&self) -> f32 {
        self.font_size_pt * MM_PER_PT
    }

    /// Usable text width inside a full-width cell, in em units.
    pub fn text_width_em(&self) -> f32 {
        let cell_width =
            self.page_width_mm - self.margin_left_mm - self.margin_right_mm - 2.0 * self.cell_padding_mm;
        cell_width / self.font_size_mm()
    }

    /// Y coordinate (from the top edge) past which a new line forces a page break.
    pub fn page_break_trigger_mm(&self) -> f32 {
        self.page_height_mm - self.margin_bottom_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for Latin-1 characters above 0x7E.
    pub average_char_width: f32,
}

impl FontMetricTable {
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Breaks one source line into printed lines no wider than `max_width_em`.
    ///
    /// Breaks at the last space that fits; the space itself is dropped. A run
    /// with no space is broken mid-word. An empty line yields one empty line.
    pub fn wrap_line(&self, line: &str, max_width_em: f32) -> Vec<String> {
        let chars: Vec<char> = line.chars().collect();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut last_space: Option<usize> = None;
        let mut width = 0.0_f32;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == ' ' {
                last_space = Some(i);
            }
            width += self.char_width(c);

            if width > max_width_em {
                match last_space {
                    Some(sep) => {
                        lines.push(chars[start..sep].iter().collect());
                        i = sep + 1;
                    }
                    None => {
                        // Always emit at least one character so the loop advances.
                        let end = if i == start { i + 1 } else { i };
                        lines.push(chars[start..end].iter().collect());
                        i = end;
                    }
                }
                start = i;
                last_space = None;
                width = 0.0;
                continue;
            }
            i += 1;
        }

        lines.push(chars[start..].iter().collect());
        lines
    }
}

/// Replaces characters the built-in PDF fonts cannot encode with `?`.
pub fn to_latin1_lossy(s: &str) -> String {
    s.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static width table  (95 ASCII printable characters)
// ────────────────────────────────────────────────────────────────────────────

pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
};
