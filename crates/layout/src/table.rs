//! Table measurement: fixed column widths, padded cells, wrapped text

use crate::{wrap_text, TextMeasure};

/// Cell padding in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// One cell of text to be measured
#[derive(Clone, Copy)]
pub struct Cell<'a> {
    pub text: &'a str,
    pub font_size: f64,
    pub leading: f64,
    pub measure: &'a dyn TextMeasure,
}

impl<'a> Cell<'a> {
    pub fn new(text: &'a str, measure: &'a dyn TextMeasure, font_size: f64, leading: f64) -> Self {
        Self {
            text,
            font_size,
            leading,
            measure,
        }
    }
}

/// A row after wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub height: f64,
    /// Wrapped lines per column
    pub lines: Vec<Vec<String>>,
}

/// Column layout shared by every row of a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub col_widths: Vec<f64>,
    pub padding: Padding,
}

impl TableLayout {
    pub fn new(col_widths: Vec<f64>, padding: Padding) -> Self {
        Self {
            col_widths,
            padding,
        }
    }

    /// Two columns: a fixed key column and the rest of `total_width`
    pub fn key_value(total_width: f64, key_width: f64, padding: Padding) -> Self {
        Self::new(vec![key_width, (total_width - key_width).max(0.0)], padding)
    }

    /// Left edge of each column, relative to the table's x
    pub fn column_offsets(&self) -> Vec<f64> {
        let mut x = 0.0;
        self.col_widths
            .iter()
            .map(|w| {
                let offset = x;
                x += w;
                offset
            })
            .collect()
    }

    /// Wrap each cell to its column and compute the row height
    ///
    /// An empty cell still occupies one line. Extra cells beyond the
    /// column count are measured against the last column's width.
    pub fn measure_row(&self, cells: &[Cell<'_>]) -> MeasuredRow {
        let mut height: f64 = 0.0;
        let mut lines = Vec::with_capacity(cells.len());

        for (i, cell) in cells.iter().enumerate() {
            let col_width = self
                .col_widths
                .get(i)
                .or(self.col_widths.last())
                .copied()
                .unwrap_or(0.0);
            let inner = (col_width - self.padding.horizontal()).max(0.0);
            let wrapped = wrap_text(cell.measure, cell.text, cell.font_size, inner);
            height = height.max(wrapped.len().max(1) as f64 * cell.leading);
            lines.push(wrapped);
        }

        MeasuredRow {
            height: height + self.padding.vertical(),
            lines,
        }
    }
}
