//! # Open Hours
//!
//! Per-weekday schedule evaluation for cook storefronts.
//!
//! ## Evaluation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    is_open_at(schedule, now)                            │
//! │                                                                         │
//! │  1. Look up today's entry by weekday name                              │
//! │       └── absent or is_open=false  →  CLOSED                           │
//! │  2. Compare minutes-since-midnight against [open, close]               │
//! │       └── bounds are INCLUSIVE: 09:00 and 21:00 are both open          │
//! │  3. Missing open/close default to 09:00 / 21:00                        │
//! │       Malformed "HH:MM" evaluates closed                               │
//! │                                                                         │
//! │  No overnight windows: close must be later than open within the        │
//! │  same day, otherwise the window never matches.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result is written to `Cook::is_open` on every settings save; it is
//! NOT re-evaluated by a scheduler, so staleness between saves is an
//! accepted part of the design.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Fallback opening time when a day omits one.
pub const DEFAULT_OPEN: &str = "09:00";

/// Fallback closing time when a day omits one.
pub const DEFAULT_CLOSE: &str = "21:00";

// =============================================================================
// Schedule Types
// =============================================================================

/// One weekday's window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DayHours {
    /// Whether the storefront operates at all on this day.
    #[serde(default)]
    pub is_open: bool,

    /// Opening time as "HH:MM"; defaults to 09:00 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,

    /// Closing time as "HH:MM"; defaults to 21:00 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

/// Weekly schedule keyed by weekday name, Sunday first (Israeli week).
///
/// Days the cook never configured are simply absent and count as closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
}

impl WeeklySchedule {
    /// Returns the configured window for a weekday, if any.
    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Sun => self.sunday.as_ref(),
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
        }
    }

    /// Evaluates whether the storefront is open at a local timestamp.
    ///
    /// ## Example
    /// ```rust
    /// use tavshil_core::hours::{DayHours, WeeklySchedule};
    /// use chrono::NaiveDate;
    ///
    /// let mut schedule = WeeklySchedule::default();
    /// schedule.sunday = Some(DayHours {
    ///     is_open: true,
    ///     open: Some("09:00".to_string()),
    ///     close: Some("21:00".to_string()),
    /// });
    ///
    /// // 2026-08-02 is a Sunday
    /// let sunday_noon = NaiveDate::from_ymd_opt(2026, 8, 2)
    ///     .unwrap()
    ///     .and_hms_opt(12, 0, 0)
    ///     .unwrap();
    /// assert!(schedule.is_open_at(sunday_noon));
    /// ```
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        let Some(today) = self.day(at.weekday()) else {
            return false;
        };
        if !today.is_open {
            return false;
        }

        let open = parse_hhmm(today.open.as_deref().unwrap_or(DEFAULT_OPEN));
        let close = parse_hhmm(today.close.as_deref().unwrap_or(DEFAULT_CLOSE));
        let (Some(open), Some(close)) = (open, close) else {
            // Malformed times never match
            return false;
        };

        let now_minutes = at.hour() * 60 + at.minute();
        now_minutes >= open && now_minutes <= close
    }
}

/// Parses "HH:MM" into minutes since midnight.
///
/// Strict two-field format; hours 0-23, minutes 0-59.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (hours, minutes) = value.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

// =============================================================================
// Unit Tests
// =============================================================================
