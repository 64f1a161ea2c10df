//! Booking request types

use crate::dates::{format_display, nights};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Meal plans offered by the booking form
pub const MEAL_PLANS: [&str; 4] = ["Breakfast Only", "Room Only", "Half Board", "Full Board"];

pub const DEFAULT_MEAL_PLAN: &str = "Breakfast Only";

/// Free cancellation window used when a refundable booking has no deadline
pub const DEFAULT_FREE_CANCEL_DAYS: u32 = 3;

/// Everything needed to render one voucher document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherRequest {
    pub hotel: HotelInfo,

    pub check_in: NaiveDate,

    pub check_out: NaiveDate,

    #[serde(default)]
    pub room_type: String,

    #[serde(default = "default_meal_plan")]
    pub meal_plan: String,

    #[serde(default)]
    pub room_size: Option<String>,

    #[serde(default)]
    pub cancellation: CancellationPolicy,

    /// One voucher page per room
    pub rooms: Vec<GuestRoom>,

    /// Every room shows the first room's confirmation number
    #[serde(default)]
    pub same_confirmation: bool,

    /// Printed as the booking date; today when absent
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
}

fn default_meal_plan() -> String {
    DEFAULT_MEAL_PLAN.to_string()
}

/// Hotel details shown in the hotel section and policy table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelInfo {
    pub name: String,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub address_line1: String,

    #[serde(default)]
    pub address_line2: String,

    #[serde(default)]
    pub phone: String,

    /// Overrides the configured standard check-in time
    #[serde(default)]
    pub check_in_time: Option<String>,

    #[serde(default)]
    pub check_out_time: Option<String>,
}

impl HotelInfo {
    /// Address lines joined with a hard line break
    pub fn address(&self) -> String {
        let line1 = self.address_line1.trim();
        let line2 = self.address_line2.trim();
        match (line1.is_empty(), line2.is_empty()) {
            (_, true) => line1.to_string(),
            (true, false) => line2.to_string(),
            (false, false) => format!("{line1}\n{line2}"),
        }
    }
}

/// One room of the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestRoom {
    #[serde(default)]
    pub guest_name: String,

    #[serde(default)]
    pub confirmation_no: String,

    #[serde(default = "default_adults")]
    pub adults: u32,
}

fn default_adults() -> u32 {
    2
}

impl Default for GuestRoom {
    fn default() -> Self {
        Self {
            guest_name: String::new(),
            confirmation_no: String::new(),
            adults: default_adults(),
        }
    }
}

impl GuestRoom {
    /// First comma-separated guest name, or "Guest"
    pub fn lead_guest(&self) -> String {
        self.guest_name
            .split(',')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Guest")
            .to_string()
    }
}

/// Cancellation terms printed in the room section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CancellationPolicy {
    #[default]
    NonRefundable,
    Refundable {
        #[serde(rename = "freeCancelDays")]
        free_cancel_days: u32,
    },
}

impl CancellationPolicy {
    /// Human-readable policy for a stay starting on `check_in`
    pub fn describe(&self, check_in: NaiveDate) -> String {
        match self {
            CancellationPolicy::NonRefundable => "Non-Refundable & Non-Amendable".to_string(),
            CancellationPolicy::Refundable { free_cancel_days } => {
                let deadline = check_in
                    .checked_sub_days(Days::new(u64::from(*free_cancel_days)))
                    .unwrap_or(check_in);
                format!("Free Cancellation until {}", format_display(deadline))
            }
        }
    }
}

impl VoucherRequest {
    /// Add a blank room when there is none, so at least one page renders
    ///
    /// Returns true if a room was added.
    pub fn ensure_room(&mut self) -> bool {
        if self.rooms.is_empty() {
            self.rooms.push(GuestRoom::default());
            true
        } else {
            false
        }
    }

    pub fn nights(&self) -> i64 {
        nights(self.check_in, self.check_out)
    }

    /// Confirmation number printed for room `index`
    pub fn confirmation_for(&self, index: usize) -> &str {
        let room = if self.same_confirmation {
            self.rooms.first()
        } else {
            self.rooms.get(index)
        };
        room.map(|r| r.confirmation_no.as_str()).unwrap_or("")
    }

    /// Exchange check-in and check-out when they are reversed
    ///
    /// Returns true if a swap happened.
    pub fn fix_date_order(&mut self) -> bool {
        if self.check_in > self.check_out {
            std::mem::swap(&mut self.check_in, &mut self.check_out);
            true
        } else {
            false
        }
    }
}
