//! Voucher - hotel confirmation vouchers as PDF
//!
//! This crate provides:
//! - Typed booking requests (hotel, stay, rooms, cancellation policy)
//! - Brand and layout configuration read from JSON
//! - Normalization of LLM extraction payloads into requests
//! - The renderer: one A4 page per room with a fitted terms block
//!
//! Data problems never fail a render. They come back as [`Warning`]s
//! next to the PDF bytes.
//!
//! # Example
//!
//! ```ignore
//! use voucher::{VoucherConfig, VoucherImages, VoucherRenderer, VoucherRequest};
//!
//! let config = VoucherConfig::from_json(config_json)?;
//! let request: VoucherRequest = serde_json::from_str(request_json)?;
//! let images = VoucherImages::default();
//! let output = VoucherRenderer::new(&config, &images).render(&request)?;
//! std::fs::write("voucher.pdf", &output.pdf)?;
//! ```

pub mod config;
pub mod dates;
pub mod extract;
mod renderer;
mod request;
mod sections;
mod warnings;

pub use config::{parse_config, Brand, BrandPreset, VoucherConfig};
pub use renderer::{VoucherImages, VoucherOutput, VoucherRenderer};
pub use request::*;
pub use warnings::{ImageSlot, Warning};

use thiserror::Error;

/// Errors that can occur while building a voucher
#[derive(Debug, Error)]
pub enum VoucherError {
    #[error("Failed to parse config: {0}")]
    ConfigError(String),

    #[error("Layout error: {0}")]
    LayoutError(#[from] layout::LayoutError),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for voucher operations
pub type Result<T> = std::result::Result<T, VoucherError>;
