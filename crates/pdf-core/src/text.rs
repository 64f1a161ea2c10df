//! Text rendering utilities

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f64,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Encode text as a WinAnsi hex string (e.g., "<48656C6C6F>")
///
/// Characters the standard encoding cannot represent are replaced with `?`.
pub fn encode_win_ansi_hex(text: &str) -> String {
    let mut hex = String::with_capacity(text.len() * 2 + 2);
    hex.push('<');
    for c in text.chars() {
        hex.push_str(&format!("{:02X}", win_ansi_code(c)));
    }
    hex.push('>');
    hex
}

/// Map a character to its WinAnsiEncoding byte
fn win_ansi_code(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\t' => b' ',
        _ => b'?',
    }
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, Tf, Td, Tj, ET) to render text
/// at a specific position with alignment support.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<414243>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Baseline Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to `x`
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = String::new();

    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let final_x = x + x_offset;

    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Generate PDF operators for a single glyph run rotated about its origin
///
/// `angle_deg` is counter-clockwise. The run is centered horizontally on
/// `(x, y)` along the rotated baseline.
pub fn generate_rotated_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    angle_deg: f64,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    let half = ctx.text_width / 2.0;
    // shift the origin back along the rotated baseline to center the run
    let tx = x - half * cos;
    let ty = y - half * sin;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!(
        "{cos:.4} {sin:.4} {:.4} {cos:.4} {tx:.3} {ty:.3} Tm\n",
        -sin
    ));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");
    ops.into_bytes()
}
