//! Layout - measurement and fitting for fixed-size pages
//!
//! This crate provides:
//! - Page geometry with a reserved footer band
//! - Width-based word wrapping against real font metrics
//! - Table measurement (padded, wrapped cells)
//! - The auto-shrink fitter that places a variable-length paragraph block
//!   above the footer band, with an explicit overflow policy
//!
//! Everything here is pure: no drawing, no I/O.
//!
//! # Example
//!
//! ```ignore
//! use layout::{FontCandidate, PaginatedDocumentFitter};
//! use pdf_core::StandardFont;
//!
//! let fitter = PaginatedDocumentFitter::new(&StandardFont::Helvetica, FontCandidate::standard_ladder());
//! let fit = fitter.fit(140.0, &terms, 510.0);
//! if fit.overflowed {
//!     // caller applies its OverflowPolicy
//! }
//! ```

mod fitter;
mod geometry;
mod measure;
mod table;
mod wrap;

pub use fitter::{
    FitResult, FitterConfig, FontCandidate, OverflowPolicy, PaginatedDocumentFitter, Placement,
};
pub use geometry::PageGeometry;
pub use measure::TextMeasure;
pub use table::{Cell, MeasuredRow, Padding, TableLayout};
pub use wrap::wrap_text;

use thiserror::Error;

/// Errors that can occur while building layout configuration
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Invalid font ladder: {0}")]
    InvalidLadder(String),

    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
