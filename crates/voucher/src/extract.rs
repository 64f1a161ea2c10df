//! Normalization of LLM booking extractions
//!
//! The model is asked for a JSON object but answers drift: fenced code
//! blocks, numbers as strings, dates in whatever form the confirmation
//! used, placeholder values copied from the prompt. Everything here is
//! lenient and reports what it had to repair as [`Warning`]s.

use crate::dates::{format_display, parse_smart_date};
use crate::request::{
    CancellationPolicy, GuestRoom, HotelInfo, VoucherRequest, DEFAULT_FREE_CANCEL_DAYS,
    DEFAULT_MEAL_PLAN,
};
use crate::warnings::{record, Warning};
use crate::Result;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Remove Markdown code fences around a JSON answer
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Strip JSON artifacts from an extracted value
///
/// Values that start with `{` or `[`, or contain quotes, lose every `"`,
/// `'`, `{` and `}`. Prompt placeholders such as `room_type` become empty.
pub fn clean_extracted_text(raw: &str) -> String {
    let mut s = raw.trim().to_string();
    if s.starts_with('{') || s.starts_with('[') || s.contains('"') || s.contains('\'') {
        s.retain(|c| !matches!(c, '"' | '\'' | '{' | '}'));
    }

    match s.to_lowercase().as_str() {
        "room_name" | "room_type" | "room type" => String::new(),
        _ => s,
    }
}

/// Booking fields as returned by the model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractedBooking {
    #[serde(deserialize_with = "lenient_string")]
    pub hotel_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub checkin_raw: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub checkout_raw: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub meal_plan: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_refundable: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub cancel_deadline_raw: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub room_size: Option<String>,
    #[serde(deserialize_with = "lenient_rooms")]
    pub rooms: Vec<ExtractedRoom>,
}

/// One room as returned by the model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractedRoom {
    #[serde(deserialize_with = "lenient_string")]
    pub guest_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub confirmation_no: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub room_type: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub adults: Option<u32>,
}

/// Hotel contact details as returned by the model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractedHotelDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub addr1: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub addr2: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(rename = "in", deserialize_with = "lenient_string")]
    pub check_in_time: Option<String>,
    #[serde(rename = "out", deserialize_with = "lenient_string")]
    pub check_out_time: Option<String>,
}

fn value_to_text(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(value_to_text(Value::deserialize(d)?))
}

fn lenient_bool<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "refundable" => Some(true),
            "false" | "no" | "n" | "non-refundable" | "nonrefundable" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_u32<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s
            .trim()
            .split_whitespace()
            .next()
            .and_then(|n| n.parse().ok()),
        _ => None,
    })
}

fn lenient_rooms<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<ExtractedRoom>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Object(map) => serde_json::from_value(Value::Object(map))
            .ok()
            .into_iter()
            .collect(),
        _ => Vec::new(),
    })
}

/// Parse a booking extraction from raw model output
pub fn parse_extraction(raw: &str) -> Result<ExtractedBooking> {
    Ok(serde_json::from_str(&strip_code_fences(raw))?)
}

/// Parse hotel contact details from raw model output
pub fn parse_hotel_details(raw: &str) -> Result<ExtractedHotelDetails> {
    Ok(serde_json::from_str(&strip_code_fences(raw))?)
}

impl ExtractedHotelDetails {
    /// Copy the non-empty details onto `hotel`
    pub fn apply_to(&self, hotel: &mut HotelInfo) {
        if let Some(addr1) = &self.addr1 {
            hotel.address_line1 = addr1.clone();
        }
        if let Some(addr2) = &self.addr2 {
            hotel.address_line2 = addr2.clone();
        }
        if let Some(phone) = &self.phone {
            hotel.phone = phone.clone();
        }
        if self.check_in_time.is_some() {
            hotel.check_in_time = self.check_in_time.clone();
        }
        if self.check_out_time.is_some() {
            hotel.check_out_time = self.check_out_time.clone();
        }
    }
}

impl ExtractedBooking {
    /// Build a renderable request, repairing what is missing
    ///
    /// `today` stands in for a missing check-in; check-out defaults to the
    /// day after check-in.
    pub fn into_request(self, today: NaiveDate) -> (VoucherRequest, Vec<Warning>) {
        let mut warnings = Vec::new();

        let parsed_in = self.checkin_raw.as_deref().and_then(parse_smart_date);
        let parsed_out = self.checkout_raw.as_deref().and_then(parse_smart_date);

        let check_in = parsed_in.unwrap_or_else(|| {
            record(
                &mut warnings,
                Warning::UnparseableDate {
                    field: "checkIn".to_string(),
                    raw: self.checkin_raw.clone().unwrap_or_default(),
                    fallback: today,
                },
            );
            today
        });
        let check_out = parsed_out.unwrap_or_else(|| {
            let fallback = check_in.checked_add_days(Days::new(1)).unwrap_or(check_in);
            record(
                &mut warnings,
                Warning::UnparseableDate {
                    field: "checkOut".to_string(),
                    raw: self.checkout_raw.clone().unwrap_or_default(),
                    fallback,
                },
            );
            fallback
        });

        let room_type = match self.rooms.first().and_then(|r| r.room_type.as_deref()) {
            Some(raw) => {
                let cleaned = clean_extracted_text(raw);
                if cleaned != raw.trim() {
                    record(
                        &mut warnings,
                        Warning::FieldCleaned {
                            field: "roomType".to_string(),
                        },
                    );
                }
                cleaned
            }
            None => String::new(),
        };

        let rooms: Vec<GuestRoom> = self
            .rooms
            .iter()
            .map(|room| GuestRoom {
                guest_name: room.guest_name.clone().unwrap_or_default(),
                confirmation_no: room.confirmation_no.clone().unwrap_or_default(),
                adults: room.adults.filter(|n| *n > 0).unwrap_or(2),
            })
            .collect();

        let mut request = VoucherRequest {
            hotel: HotelInfo {
                name: self.hotel_name.clone().unwrap_or_default(),
                city: self.city.clone(),
                ..HotelInfo::default()
            },
            check_in,
            check_out,
            room_type,
            meal_plan: self
                .meal_plan
                .clone()
                .unwrap_or_else(|| DEFAULT_MEAL_PLAN.to_string()),
            room_size: self.room_size.clone(),
            cancellation: CancellationPolicy::NonRefundable,
            rooms,
            same_confirmation: false,
            booking_date: None,
        };
        request.ensure_room();

        if request.fix_date_order() {
            record(&mut warnings, Warning::DatesSwapped);
        }

        if self.is_refundable == Some(true) {
            let deadline = self.cancel_deadline_raw.as_deref().and_then(parse_smart_date);
            let free_cancel_days = match deadline {
                Some(deadline) => (request.check_in - deadline).num_days().max(1) as u32,
                None => {
                    if let Some(raw) = &self.cancel_deadline_raw {
                        let fallback = request
                            .check_in
                            .checked_sub_days(Days::new(u64::from(DEFAULT_FREE_CANCEL_DAYS)))
                            .unwrap_or(request.check_in);
                        record(
                            &mut warnings,
                            Warning::UnparseableDate {
                                field: "cancelDeadline".to_string(),
                                raw: raw.clone(),
                                fallback,
                            },
                        );
                    }
                    DEFAULT_FREE_CANCEL_DAYS
                }
            };
            request.cancellation = CancellationPolicy::Refundable { free_cancel_days };
        }

        debug!(
            hotel = %request.hotel.name,
            check_in = %format_display(request.check_in),
            rooms = request.rooms.len(),
            "extraction normalized"
        );
        (request, warnings)
    }
}

/// Turn raw model output into a request, never failing
///
/// Unreadable output yields an [`Warning::ExtractionFailed`] and a request
/// built from empty fields.
pub fn request_from_extraction(raw: &str, today: NaiveDate) -> (VoucherRequest, Vec<Warning>) {
    match parse_extraction(raw) {
        Ok(booking) => booking.into_request(today),
        Err(e) => {
            let mut warnings = Vec::new();
            record(
                &mut warnings,
                Warning::ExtractionFailed {
                    reason: e.to_string(),
                },
            );
            let (request, more) = ExtractedBooking::default().into_request(today);
            warnings.extend(more);
            (request, warnings)
        }
    }
}
