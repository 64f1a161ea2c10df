//! The fixed blocks of a room page, as data

use crate::config::CheckInPolicyConfig;
use crate::dates::format_display;
use crate::request::VoucherRequest;
use chrono::NaiveDate;

/// How the value column of a row is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueStyle {
    Bold,
    /// Regular weight, grey, tighter leading
    Plain,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub key: String,
    pub value: String,
    pub style: ValueStyle,
}

impl Row {
    fn bold(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
            style: ValueStyle::Bold,
        }
    }

    fn plain(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
            style: ValueStyle::Plain,
        }
    }
}

/// A fixed-height block drawn top-down before the terms
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Section {
    /// Titled key/value box
    Boxed { title: String, rows: Vec<Row> },
    /// Titled grid with a filled header row
    PolicyTable {
        title: String,
        header: [String; 2],
        rows: Vec<[String; 2]>,
    },
}

/// Sections for the room at `index`, in drawing order
pub(crate) fn room_sections(
    request: &VoucherRequest,
    index: usize,
    booking_date: NaiveDate,
    policy: &CheckInPolicyConfig,
) -> Vec<Section> {
    let room = request.rooms.get(index).cloned().unwrap_or_default();
    let hotel = &request.hotel;

    let guest = Section::Boxed {
        title: "Guest Information".to_string(),
        rows: vec![
            Row::bold("Guest Name:", room.guest_name.clone()),
            Row::bold("Confirmation No.:", request.confirmation_for(index)),
            Row::bold("Booking Date:", format_display(booking_date)),
        ],
    };

    let hotel_section = Section::Boxed {
        title: "Hotel Details".to_string(),
        rows: vec![
            Row::bold("Hotel:", hotel.name.clone()),
            Row::plain("Address:", hotel.address()),
            Row::bold("Phone:", hotel.phone.clone()),
            Row::bold("Check-In:", format_display(request.check_in)),
            Row::bold("Check-Out:", format_display(request.check_out)),
            Row::bold("Nights:", request.nights().to_string()),
        ],
    };

    let mut room_rows = vec![
        Row::bold("Room Type:", request.room_type.clone()),
        Row::bold("No. of Pax:", format!("{} Adults", room.adults)),
        Row::bold("Meal Plan:", request.meal_plan.clone()),
    ];
    if let Some(size) = request.room_size.as_deref().filter(|s| !s.trim().is_empty()) {
        room_rows.push(Row::bold("Size:", size));
    }
    room_rows.push(Row::bold(
        "Cancellation:",
        request.cancellation.describe(request.check_in),
    ));
    let room_section = Section::Boxed {
        title: "Room Information".to_string(),
        rows: room_rows,
    };

    let check_in_time = hotel
        .check_in_time
        .clone()
        .unwrap_or_else(|| policy.check_in_time.clone());
    let check_out_time = hotel
        .check_out_time
        .clone()
        .unwrap_or_else(|| policy.check_out_time.clone());
    let policy_section = Section::PolicyTable {
        title: policy.title.clone(),
        header: ["Policy".to_string(), "Time / Detail".to_string()],
        rows: vec![
            ["Standard Check-in Time:".to_string(), check_in_time],
            ["Standard Check-out Time:".to_string(), check_out_time],
            ["Early Check-in/Late Out:".to_string(), policy.early_late.clone()],
            ["Required at Check-in:".to_string(), policy.required_documents.clone()],
        ],
    };

    vec![guest, hotel_section, room_section, policy_section]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CancellationPolicy, GuestRoom, HotelInfo};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> VoucherRequest {
        VoucherRequest {
            hotel: HotelInfo {
                name: "Grand Palace Hotel".into(),
                address_line1: "1 Main Road".into(),
                address_line2: "Bangkok 10110".into(),
                phone: "+66 2 000 0000".into(),
                check_in_time: Some("2:00 PM".into()),
                ..HotelInfo::default()
            },
            check_in: date(2025, 9, 28),
            check_out: date(2025, 10, 1),
            room_type: "Deluxe King".into(),
            meal_plan: "Room Only".into(),
            room_size: Some("32 sqm".into()),
            cancellation: CancellationPolicy::NonRefundable,
            rooms: vec![
                GuestRoom {
                    guest_name: "JOHN SMITH".into(),
                    confirmation_no: "ABC123".into(),
                    adults: 2,
                },
                GuestRoom {
                    guest_name: "JANE SMITH".into(),
                    confirmation_no: "XYZ789".into(),
                    adults: 1,
                },
            ],
            same_confirmation: true,
            booking_date: None,
        }
    }

    fn boxed_rows(section: &Section) -> Vec<(String, String)> {
        match section {
            Section::Boxed { rows, .. } => rows
                .iter()
                .map(|r| (r.key.clone(), r.value.clone()))
                .collect(),
            Section::PolicyTable { .. } => Vec::new(),
        }
    }

    #[test]
    fn test_section_order_and_content() {
        let sections = room_sections(
            &request(),
            1,
            date(2025, 8, 1),
            &CheckInPolicyConfig::default(),
        );
        assert_eq!(sections.len(), 4);

        let guest = boxed_rows(&sections[0]);
        assert_eq!(guest[0].1, "JANE SMITH");
        // same confirmation for every room
        assert_eq!(guest[1].1, "ABC123");
        assert_eq!(guest[2].1, "01 Aug 2025");

        let hotel = boxed_rows(&sections[1]);
        assert_eq!(hotel[1].1, "1 Main Road\nBangkok 10110");
        assert_eq!(hotel[3].1, "28 Sep 2025");
        assert_eq!(hotel[5].1, "3");

        let room = boxed_rows(&sections[2]);
        assert_eq!(room[1].1, "1 Adults");
        assert_eq!(room[3], ("Size:".to_string(), "32 sqm".to_string()));
        assert_eq!(room[4].1, "Non-Refundable & Non-Amendable");
    }

    #[test]
    fn test_address_row_is_plain() {
        let sections = room_sections(
            &request(),
            0,
            date(2025, 8, 1),
            &CheckInPolicyConfig::default(),
        );
        match &sections[1] {
            Section::Boxed { rows, .. } => assert_eq!(rows[1].style, ValueStyle::Plain),
            other => panic!("unexpected section {other:?}"),
        }
    }

    #[test]
    fn test_size_row_omitted_when_blank() {
        let mut request = request();
        request.room_size = Some("  ".into());
        let sections = room_sections(
            &request,
            0,
            date(2025, 8, 1),
            &CheckInPolicyConfig::default(),
        );
        assert_eq!(boxed_rows(&sections[2]).len(), 4);
    }

    #[test]
    fn test_policy_times_prefer_hotel() {
        let sections = room_sections(
            &request(),
            0,
            date(2025, 8, 1),
            &CheckInPolicyConfig::default(),
        );
        match &sections[3] {
            Section::PolicyTable { rows, header, .. } => {
                assert_eq!(header[1], "Time / Detail");
                assert_eq!(rows[0][1], "2:00 PM");
                assert_eq!(rows[1][1], "12:00 PM");
            }
            other => panic!("unexpected section {other:?}"),
        }
    }
}
