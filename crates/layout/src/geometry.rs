//! Page geometry with a reserved footer band

use crate::{LayoutError, Result};

/// Fixed page size plus the margins the body content must respect
///
/// Coordinates are PDF user space: origin bottom-left, y grows upwards.
/// Everything below `footer_top()` belongs to the footer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    /// Height of the band at the bottom reserved for seal and rule
    pub footer_reserved: f64,
}

impl PageGeometry {
    pub fn new(
        width: f64,
        height: f64,
        margin_left: f64,
        margin_right: f64,
        margin_top: f64,
        footer_reserved: f64,
    ) -> Result<Self> {
        let values = [width, height, margin_left, margin_right, margin_top, footer_reserved];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(LayoutError::InvalidGeometry(
                "dimensions must be finite and non-negative".into(),
            ));
        }
        if margin_left + margin_right >= width {
            return Err(LayoutError::InvalidGeometry(format!(
                "horizontal margins {} + {} leave no room on a {} pt page",
                margin_left, margin_right, width
            )));
        }
        if footer_reserved >= height - margin_top {
            return Err(LayoutError::InvalidGeometry(format!(
                "footer band {} reaches the top margin of a {} pt page",
                footer_reserved, height
            )));
        }

        Ok(Self {
            width,
            height,
            margin_left,
            margin_right,
            margin_top,
            footer_reserved,
        })
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Highest y a body block may start at
    pub fn content_top(&self) -> f64 {
        self.height - self.margin_top
    }

    /// Lowest y a body block may reach
    pub fn footer_top(&self) -> f64 {
        self.footer_reserved
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }
}
