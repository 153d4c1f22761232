//! Show listings and the venues they run in.
//!
//! `available_seats` is display-only. Nothing here reserves or decrements
//! seats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MovieId, ScreenId, ShowId, TheaterId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    pub id: TheaterId,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,
    pub screen_number: u32,
    #[serde(default)]
    pub screen_type: Option<String>,
}

/// One scheduled screening, with its theater and screen joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,

    pub movie_id: MovieId,

    #[serde(default, alias = "theaters")]
    pub theater: Option<Theater>,

    #[serde(default, alias = "screens")]
    pub screen: Option<Screen>,

    /// Raw date column: `YYYY-MM-DD`, or a full timestamp on some backends.
    #[serde(default)]
    pub show_date: Option<String>,

    #[serde(default)]
    pub show_time: Option<NaiveTime>,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub available_seats: u32,
}

impl Show {
    /// Returns the calendar date of the show.
    ///
    /// Timestamps keep the date as written in their own offset; the time
    /// part is dropped. Returns `None` when the column is absent or
    /// unparseable.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.show_date.as_deref().and_then(parse_calendar_date)
    }

    pub fn theater_id(&self) -> Option<&TheaterId> {
        self.theater.as_ref().map(|t| &t.id)
    }
}

pub(crate) fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plain_date_parses() {
        assert_eq!(parse_calendar_date("2024-05-01"), Some(date(2024, 5, 1)));
    }

    #[test]
    fn timestamp_keeps_its_own_calendar_date() {
        assert_eq!(
            parse_calendar_date("2024-05-01T23:30:00+05:30"),
            Some(date(2024, 5, 1))
        );
        assert_eq!(
            parse_calendar_date("2024-05-01 09:00:00"),
            Some(date(2024, 5, 1))
        );
    }

    #[test]
    fn garbage_date_is_none() {
        assert_eq!(parse_calendar_date("next tuesday"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn relational_row_deserializes_with_joined_tables() {
        let show: Show = serde_json::from_value(json!({
            "id": "show-1",
            "movie_id": "m1",
            "show_date": "2024-05-01",
            "show_time": "18:30:00",
            "price": 250.0,
            "available_seats": 42,
            "status": "active",
            "theaters": {
                "id": "t1",
                "name": "PVR Phoenix",
                "location": "Lower Parel",
                "city": "Mumbai",
                "facilities": ["Dolby Atmos", "Recliners"]
            },
            "screens": { "id": "sc1", "screen_number": 3, "screen_type": "IMAX" }
        }))
        .unwrap();

        assert_eq!(show.theater_id().map(|t| t.as_str()), Some("t1"));
        assert_eq!(show.screen.as_ref().map(|s| s.screen_number), Some(3));
        assert_eq!(show.calendar_date(), Some(date(2024, 5, 1)));
        assert_eq!(show.available_seats, 42);
    }
}
