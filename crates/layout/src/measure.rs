//! Text measurement seam between layout and the PDF backend

use pdf_core::StandardFont;

/// Anything that can report the advance width of a run of text
pub trait TextMeasure {
    /// Width of `text` in points at `font_size`
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

impl TextMeasure for StandardFont {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.text_width_points(text, font_size)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        (**self).text_width(text, font_size)
    }
}

/// Every character is `em` wide; keeps test arithmetic exact
#[cfg(test)]
pub(crate) struct FixedWidth(pub f64);

#[cfg(test)]
impl TextMeasure for FixedWidth {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.0 * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_font_measure() {
        let width = TextMeasure::text_width(&StandardFont::Helvetica, "Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-9);
    }

    #[test]
    fn test_measure_through_reference() {
        let font = StandardFont::HelveticaBold;
        let by_ref: &dyn TextMeasure = &font;
        assert_eq!(by_ref.text_width("A", 10.0), TextMeasure::text_width(&font, "A", 10.0));
    }
}
