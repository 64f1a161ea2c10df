//! Recoverable problems reported alongside the PDF

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Image inputs a voucher can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Exterior,
    Lobby,
    Room,
    Logo,
}

impl ImageSlot {
    /// The three photo slots, left to right
    pub const ROW: [ImageSlot; 3] = [ImageSlot::Exterior, ImageSlot::Lobby, ImageSlot::Room];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Exterior => "exterior",
            ImageSlot::Lobby => "lobby",
            ImageSlot::Room => "room",
            ImageSlot::Logo => "logo",
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exterior" => Ok(ImageSlot::Exterior),
            "lobby" => Ok(ImageSlot::Lobby),
            "room" => Ok(ImageSlot::Room),
            "logo" => Ok(ImageSlot::Logo),
            other => Err(format!("unknown image slot '{other}'")),
        }
    }
}

/// A degraded field or layout decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Warning {
    /// A date could not be read and was replaced
    #[serde(rename_all = "camelCase")]
    UnparseableDate {
        field: String,
        raw: String,
        fallback: NaiveDate,
    },
    /// Check-in was after check-out; the two were exchanged
    DatesSwapped,
    /// The request listed no rooms; one blank room page was rendered
    NoRooms,
    #[serde(rename_all = "camelCase")]
    ImageSkipped { slot: ImageSlot, reason: String },
    /// The company name is printed instead of a logo
    LogoMissing,
    #[serde(rename_all = "camelCase")]
    ExtractionFailed { reason: String },
    /// Artifacts were stripped from an extracted value
    #[serde(rename_all = "camelCase")]
    FieldCleaned { field: String },
    /// The terms block reaches into the footer band on this page
    #[serde(rename_all = "camelCase")]
    FooterOverlap { page: usize },
    /// The terms block was moved to a page of its own
    #[serde(rename_all = "camelCase")]
    ContinuationPage { page: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnparseableDate {
                field,
                raw,
                fallback,
            } => write!(
                f,
                "could not read {field} date '{raw}', using {}",
                fallback.format("%d %b %Y")
            ),
            Warning::DatesSwapped => f.write_str("check-in was after check-out, dates swapped"),
            Warning::NoRooms => f.write_str("request has no rooms, rendered one blank room"),
            Warning::ImageSkipped { slot, reason } => {
                write!(f, "{slot} image skipped: {reason}")
            }
            Warning::LogoMissing => f.write_str("no usable logo, company name printed instead"),
            Warning::ExtractionFailed { reason } => write!(f, "extraction failed: {reason}"),
            Warning::FieldCleaned { field } => write!(f, "cleaned extracted {field}"),
            Warning::FooterOverlap { page } => {
                write!(f, "terms overlap the footer on page {page}")
            }
            Warning::ContinuationPage { page } => {
                write!(f, "terms moved to continuation page {page}")
            }
        }
    }
}

/// Log and keep a warning
pub(crate) fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    warn!(%warning, "voucher degraded");
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_warning_json_shape() {
        let warning = Warning::UnparseableDate {
            field: "checkIn".to_string(),
            raw: "soon".to_string(),
            fallback: NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "unparseableDate",
                "field": "checkIn",
                "raw": "soon",
                "fallback": "2025-09-28"
            })
        );

        let json = serde_json::to_value(Warning::ImageSkipped {
            slot: ImageSlot::Lobby,
            reason: "bad bytes".into(),
        })
        .unwrap();
        assert_eq!(json["slot"], "lobby");
        assert_eq!(json["kind"], "imageSkipped");
    }

    #[test]
    fn test_warning_display() {
        assert_eq!(
            Warning::FooterOverlap { page: 2 }.to_string(),
            "terms overlap the footer on page 2"
        );
        assert_eq!(
            Warning::ImageSkipped {
                slot: ImageSlot::Exterior,
                reason: "truncated".into()
            }
            .to_string(),
            "exterior image skipped: truncated"
        );
    }

    #[test]
    fn test_image_slot_from_str() {
        assert_eq!("Lobby".parse::<ImageSlot>(), Ok(ImageSlot::Lobby));
        assert!("pool".parse::<ImageSlot>().is_err());
    }

    #[test]
    fn test_record_keeps_order() {
        let mut warnings = Vec::new();
        record(&mut warnings, Warning::DatesSwapped);
        record(&mut warnings, Warning::LogoMissing);
        assert_eq!(warnings, vec![Warning::DatesSwapped, Warning::LogoMissing]);
    }
}
