//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Building a new PDF document page by page
//! - Drawing text with the standard Helvetica fonts (with width metrics)
//! - Drawing lines, rectangles and circles
//! - Inserting images (JPEG, PNG)
//! - Constant-alpha graphics states for watermarks and seals
//!
//! All coordinates are PDF user-space points measured from the bottom-left
//! corner of the page.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, PdfDocument, StandardFont};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_page();
//! doc.set_font(StandardFont::HelveticaBold, 16.0);
//! doc.insert_text("HOTEL CONFIRMATION VOUCHER", page, 297.6, 750.0, Align::Center)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, PdfDocument, A4_HEIGHT, A4_WIDTH};
pub use font::StandardFont;
pub use graphics::{LineStyle, PaintMode};
pub use image::{calculate_scaled_dimensions, detect_format, ImageFormat, ImageScaleMode};
pub use text::{encode_win_ansi_hex, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
