//! Brand and layout configuration
//!
//! Read from JSON with camelCase keys. Every field has a default, so `{}`
//! is a valid config that renders with the Odaduu brand.

use crate::{Result, VoucherError};
use layout::{FontCandidate, OverflowPolicy, PageGeometry};
use pdf_core::{A4_HEIGHT, A4_WIDTH};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RGB color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for pdf_core::Color {
    fn from(c: Color) -> Self {
        pdf_core::Color::rgb(c.r, c.g, c.b)
    }
}

/// The circular stamp in the footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SealStyle {
    pub title: String,
    pub subtitle: String,
    /// Text set along the top of the inner ring
    pub arc_top: Option<String>,
    /// Text set along the bottom of the inner ring
    pub arc_bottom: Option<String>,
    pub color: Color,
    /// Alpha for the rings
    pub ring_alpha: f64,
    /// Alpha for the lettering
    pub text_alpha: f64,
    pub outer_line_width: f64,
    pub inner_line_width: f64,
    /// Distance of the subtitle baseline below the center
    pub subtitle_offset: f64,
}

impl Default for SealStyle {
    fn default() -> Self {
        Brand::odaduu().seal
    }
}

/// Company identity printed on every page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    pub company_name: String,
    pub title: String,
    /// Headings and table header background
    pub primary: Color,
    /// Box borders and the footer rule
    pub accent: Color,
    pub seal: SealStyle,
    pub footer_line_width: f64,
    /// Contact address printed under the issuer line
    pub email: Option<String>,
    /// Path to a PNG or JPEG logo, loaded by the caller
    pub logo: Option<String>,
}

impl Brand {
    pub fn odaduu() -> Self {
        let blue = Color::rgb(0.05, 0.15, 0.35);
        Self {
            company_name: "Odaduu Travel DMC".to_string(),
            title: "HOTEL CONFIRMATION VOUCHER".to_string(),
            primary: blue,
            accent: Color::rgb(0.95, 0.42, 0.13),
            seal: SealStyle {
                title: "ODADUU".to_string(),
                subtitle: "TRAVEL DMC".to_string(),
                arc_top: Some("CERTIFIED VOUCHER".to_string()),
                arc_bottom: Some("OFFICIAL".to_string()),
                color: blue,
                ring_alpha: 0.85,
                text_alpha: 1.0,
                outer_line_width: 1.4,
                inner_line_width: 0.6,
                subtitle_offset: 7.0,
            },
            footer_line_width: 2.0,
            email: None,
            logo: None,
        }
    }

    pub fn fly_goldfinch() -> Self {
        let blue = Color::rgb(0.0, 0.25, 0.5);
        Self {
            company_name: "FLY GOLDFINCH".to_string(),
            title: "HOTEL CONFIRMATION VOUCHER".to_string(),
            primary: blue,
            accent: Color::rgb(0.9, 0.75, 0.1),
            seal: SealStyle {
                title: "FLY".to_string(),
                subtitle: "GOLDFINCH".to_string(),
                arc_top: None,
                arc_bottom: None,
                color: blue,
                ring_alpha: 0.8,
                text_alpha: 0.8,
                outer_line_width: 1.5,
                inner_line_width: 0.5,
                subtitle_offset: 6.0,
            },
            footer_line_width: 3.0,
            email: None,
            logo: None,
        }
    }
}

impl Default for Brand {
    fn default() -> Self {
        Self::odaduu()
    }
}

/// Named brand presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrandPreset {
    Odaduu,
    FlyGoldfinch,
}

impl BrandPreset {
    pub fn brand(&self) -> Brand {
        match self {
            BrandPreset::Odaduu => Brand::odaduu(),
            BrandPreset::FlyGoldfinch => Brand::fly_goldfinch(),
        }
    }
}

impl FromStr for BrandPreset {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "odaduu" => Ok(BrandPreset::Odaduu),
            "flygoldfinch" | "goldfinch" => Ok(BrandPreset::FlyGoldfinch),
            _ => Err(VoucherError::ConfigError(format!(
                "unknown brand preset '{s}'"
            ))),
        }
    }
}

/// Page size, margins and the footer band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    /// Body content stays above this y
    pub footer_safe_y: f64,
    /// Height of the footer rule
    pub footer_line_y: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 40.0,
            footer_safe_y: 140.0,
            footer_line_y: 40.0,
        }
    }
}

impl PageConfig {
    pub fn geometry(&self) -> Result<PageGeometry> {
        Ok(PageGeometry::new(
            self.width,
            self.height,
            self.margin_left,
            self.margin_right,
            self.margin_top,
            self.footer_safe_y,
        )?)
    }
}

/// Serializable mirror of [`OverflowPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowMode {
    NewPage,
    #[default]
    Clamp,
}

impl From<OverflowMode> for OverflowPolicy {
    fn from(mode: OverflowMode) -> Self {
        match mode {
            OverflowMode::NewPage => OverflowPolicy::NewPage,
            OverflowMode::Clamp => OverflowPolicy::Clamp,
        }
    }
}

/// The terms and conditions block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TermsConfig {
    pub title: String,
    pub start_size: f64,
    pub start_leading: f64,
    pub min_size: f64,
    pub step: f64,
    pub leading_floor: f64,
    pub overflow: OverflowMode,
    pub padding_x: f64,
    pub padding_y: f64,
    /// `{lead_guest}` is replaced with the room's lead guest
    pub lines: Vec<String>,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            title: "STANDARD HOTEL BOOKING TERMS & CONDITIONS".to_string(),
            start_size: 7.0,
            start_leading: 8.2,
            min_size: 5.2,
            step: 0.2,
            leading_floor: 6.4,
            overflow: OverflowMode::Clamp,
            padding_x: 6.0,
            padding_y: 3.0,
            lines: [
                "1. Voucher Validity: Must be presented at hotel front desk.",
                "2. Identification: Guest(s) {lead_guest} must present valid ID.",
                "3. No-Show: Full charge applies for no-shows.",
                "4. Incidentals: Paid by guest directly.",
                "5. Occupancy: Standard occupancy rules apply.",
                "6. Rights: Hotel reserves right of admission.",
                "7. Liability: Use safety deposit box for valuables.",
                "8. Resale: Booking is non-transferable.",
                "9. Tax: City/Tourism tax payable at hotel if applicable.",
                "10. Bedding: Subject to availability.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl TermsConfig {
    pub fn ladder(&self) -> Result<Vec<FontCandidate>> {
        Ok(FontCandidate::stepped(
            self.start_size,
            self.start_leading,
            self.min_size,
            self.step,
            self.leading_floor,
        )?)
    }

    /// Terms with the lead guest filled in
    pub fn lines_for(&self, lead_guest: &str) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.replace("{lead_guest}", lead_guest))
            .collect()
    }
}

/// The check-in / check-out policy table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckInPolicyConfig {
    pub title: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub early_late: String,
    pub required_documents: String,
}

impl Default for CheckInPolicyConfig {
    fn default() -> Self {
        Self {
            title: "HOTEL CHECK-IN & CHECK-OUT POLICY".to_string(),
            check_in_time: "3:00 PM".to_string(),
            check_out_time: "12:00 PM".to_string(),
            early_late: "Subject to availability. Request upon arrival.".to_string(),
            required_documents: "Passport & Credit Card/Cash Deposit.".to_string(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VoucherConfig {
    /// Applied before `brand` when present
    pub preset: Option<BrandPreset>,
    pub brand: Brand,
    pub page: PageConfig,
    pub terms: TermsConfig,
    pub check_in_policy: CheckInPolicyConfig,
}

impl VoucherConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        parse_config(json)
    }

    pub fn with_brand(mut self, brand: Brand) -> Self {
        self.brand = brand;
        self
    }

    /// Check that the page and terms settings can be laid out
    pub fn validate(&self) -> Result<()> {
        self.page.geometry()?;
        self.terms.ladder()?;
        Ok(())
    }
}

/// Parse a config from JSON
///
/// A `preset` without an explicit `brand` selects that preset's brand.
pub fn parse_config(json: &str) -> Result<VoucherConfig> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| VoucherError::ConfigError(e.to_string()))?;
    let has_brand = value.get("brand").is_some();

    let mut config: VoucherConfig =
        serde_json::from_value(value).map_err(|e| VoucherError::ConfigError(e.to_string()))?;
    if let (Some(preset), false) = (config.preset, has_brand) {
        config.brand = preset.brand();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_odaduu() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.brand, Brand::odaduu());
        assert_eq!(config.page.footer_safe_y, 140.0);
        assert_eq!(config.terms.lines.len(), 10);
        assert_eq!(config.terms.overflow, OverflowMode::Clamp);
    }

    #[test]
    fn test_preset_selects_brand() {
        let config = parse_config(r#"{ "preset": "flyGoldfinch" }"#).unwrap();
        assert_eq!(config.brand.seal.title, "FLY");
        assert_eq!(config.brand.footer_line_width, 3.0);
    }

    #[test]
    fn test_partial_brand_override() {
        let json = r#"{
            "brand": { "companyName": "Acme Travel", "accent": { "r": 0.1, "g": 0.2, "b": 0.3 } },
            "terms": { "overflow": "newPage", "lines": ["Only clause for {lead_guest}."] }
        }"#;
        let config = parse_config(json).unwrap();
        assert_eq!(config.brand.company_name, "Acme Travel");
        assert_eq!(config.brand.accent, Color::rgb(0.1, 0.2, 0.3));
        // untouched fields keep their defaults
        assert_eq!(config.brand.seal.title, "ODADUU");
        assert_eq!(config.terms.overflow, OverflowMode::NewPage);
        assert_eq!(config.terms.start_size, 7.0);
        assert_eq!(config.terms.lines_for("JOHN"), vec!["Only clause for JOHN."]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_config("{ not json"),
            Err(VoucherError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let result = parse_config(r#"{ "page": { "marginLeft": 400, "marginRight": 400 } }"#);
        assert!(matches!(result, Err(VoucherError::LayoutError(_))));
    }

    #[test]
    fn test_invalid_ladder_rejected() {
        let result = parse_config(r#"{ "terms": { "step": 0 } }"#);
        assert!(matches!(result, Err(VoucherError::LayoutError(_))));
    }

    #[test]
    fn test_brand_preset_from_str() {
        assert_eq!("odaduu".parse::<BrandPreset>().unwrap(), BrandPreset::Odaduu);
        assert_eq!(
            "fly-goldfinch".parse::<BrandPreset>().unwrap(),
            BrandPreset::FlyGoldfinch
        );
        assert_eq!(
            "FlyGoldfinch".parse::<BrandPreset>().unwrap(),
            BrandPreset::FlyGoldfinch
        );
        assert!("acme".parse::<BrandPreset>().is_err());
    }

    #[test]
    fn test_default_ladder() {
        let ladder = TermsConfig::default().ladder().unwrap();
        assert_eq!(ladder.first(), Some(&FontCandidate::new(7.0, 8.2)));
        assert_eq!(ladder.last(), Some(&FontCandidate::new(5.2, 6.4)));
    }
}
