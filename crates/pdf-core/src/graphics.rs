//! Vector graphics operators (lines, rectangles, circles)

use crate::document::Color;

/// Bezier control distance for approximating a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

/// Stroke settings for lines and outlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Line width in points
    pub width: f64,
    /// Stroke color
    pub color: Color,
}

impl LineStyle {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new(1.0, Color::black())
    }
}

/// How a closed path is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintMode {
    /// Outline only
    Stroke(LineStyle),
    /// Fill only
    Fill(Color),
    /// Fill, then outline
    FillStroke(Color, LineStyle),
}

fn stroke_state(ops: &mut String, style: &LineStyle) {
    ops.push_str(&format!(
        "{} {} {} RG\n{} w\n",
        style.color.r, style.color.g, style.color.b, style.width
    ));
}

fn fill_state(ops: &mut String, color: &Color) {
    ops.push_str(&format!("{} {} {} rg\n", color.r, color.g, color.b));
}

fn paint(ops: &mut String, mode: &PaintMode) {
    match mode {
        PaintMode::Stroke(style) => {
            stroke_state(ops, style);
        }
        PaintMode::Fill(color) => {
            fill_state(ops, color);
        }
        PaintMode::FillStroke(color, style) => {
            fill_state(ops, color);
            stroke_state(ops, style);
        }
    }
}

fn paint_operator(mode: &PaintMode) -> &'static str {
    match mode {
        PaintMode::Stroke(_) => "S",
        PaintMode::Fill(_) => "f",
        PaintMode::FillStroke(_, _) => "B",
    }
}

/// Generate operators for a straight line segment
pub fn generate_line_operators(x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) -> Vec<u8> {
    let mut ops = String::from("q\n");
    stroke_state(&mut ops, style);
    ops.push_str(&format!("{x1} {y1} m\n{x2} {y2} l\nS\nQ\n"));
    ops.into_bytes()
}

/// Generate operators for a rectangle with its lower-left corner at `(x, y)`
pub fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    mode: &PaintMode,
) -> Vec<u8> {
    let mut ops = String::from("q\n");
    paint(&mut ops, mode);
    ops.push_str(&format!(
        "{x} {y} {width} {height} re\n{}\nQ\n",
        paint_operator(mode)
    ));
    ops.into_bytes()
}

/// Generate operators for a circle centered at `(cx, cy)`
pub fn generate_circle_operators(cx: f64, cy: f64, r: f64, mode: &PaintMode) -> Vec<u8> {
    let k = r * KAPPA;
    let mut ops = String::from("q\n");
    paint(&mut ops, mode);
    ops.push_str(&format!("{:.3} {:.3} m\n", cx + r, cy));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx + r,
        cy + k,
        cx + k,
        cy + r,
        cx,
        cy + r
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - k,
        cy + r,
        cx - r,
        cy + k,
        cx - r,
        cy
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - r,
        cy - k,
        cx - k,
        cy - r,
        cx,
        cy - r
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx + k,
        cy - r,
        cx + r,
        cy - k,
        cx + r,
        cy
    ));
    ops.push_str(&format!("h\n{}\nQ\n", paint_operator(mode)));
    ops.into_bytes()
}
