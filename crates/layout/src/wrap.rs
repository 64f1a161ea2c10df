//! Width-based greedy word wrapping

use crate::TextMeasure;

/// Split text into lines that fit `max_width` points at `font_size`
///
/// Words are split on whitespace and re-joined with single spaces. A word
/// wider than `max_width` is kept whole on its own line. `\n` forces a
/// break. Whitespace-only input produces no lines.
pub fn wrap_text<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    font_size: f64,
    max_width: f64,
) -> Vec<String> {
    let space = measure.text_width(" ", font_size);
    let mut lines = Vec::new();

    for hard_line in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in hard_line.split_whitespace() {
            let word_width = measure.text_width(word, font_size);
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedWidth;
    use pdf_core::StandardFont;
    use pretty_assertions::assert_eq;

    // 1pt per character at size 1
    const MONO: FixedWidth = FixedWidth(1.0);

    #[test]
    fn test_wrap_basic() {
        let lines = wrap_text(&MONO, "Hello world this is a test", 1.0, 12.0);
        assert_eq!(lines, vec!["Hello world", "this is a", "test"]);
    }

    #[test]
    fn test_wrap_exact_fit() {
        assert_eq!(wrap_text(&MONO, "Hello world", 1.0, 11.0), vec!["Hello world"]);
        assert_eq!(wrap_text(&MONO, "Hello world", 1.0, 10.0), vec!["Hello", "world"]);
    }

    #[test]
    fn test_wrap_scales_with_font_size() {
        // at size 2 every character is 2pt wide
        let lines = wrap_text(&MONO, "Hello world", 2.0, 22.0);
        assert_eq!(lines, vec!["Hello world"]);
        let lines = wrap_text(&MONO, "Hello world", 2.0, 21.0);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_long_word_kept_whole() {
        let lines = wrap_text(&MONO, "a Supercalifragilistic b", 1.0, 5.0);
        assert_eq!(lines, vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(wrap_text(&MONO, "Hello    world", 1.0, 50.0), vec!["Hello world"]);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(wrap_text(&MONO, "", 1.0, 50.0).is_empty());
        assert!(wrap_text(&MONO, "   \n  ", 1.0, 50.0).is_empty());
    }

    #[test]
    fn test_hard_breaks() {
        let lines = wrap_text(&MONO, "Street 1\nCity 10110", 1.0, 50.0);
        assert_eq!(lines, vec!["Street 1", "City 10110"]);
    }

    #[test]
    fn test_zero_width_puts_each_word_on_a_line() {
        let lines = wrap_text(&MONO, "one two three", 1.0, 0.0);
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_helvetica_metrics() {
        // "iiii" is narrow in Helvetica (222 each), "MMMM" is wide (833 each)
        let narrow = wrap_text(&StandardFont::Helvetica, "iiii iiii", 10.0, 25.0);
        let wide = wrap_text(&StandardFont::Helvetica, "MMMM MMMM", 10.0, 25.0);
        assert_eq!(narrow.len(), 1);
        assert_eq!(wide.len(), 2);
    }
}
