//! Theater/date grouping of show listings.
//!
//! Grouping only: the caller's query order (date, then time) is trusted and
//! preserved. Theaters and dates appear in first-seen order.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::{Show, Theater};
use crate::domain::foundation::{ShowId, TheaterId};

/// Shows of one theater on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub shows: Vec<Show>,
}

/// All dated shows of one theater.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheaterGroup {
    pub theater: Theater,
    pub dates: Vec<DateGroup>,
}

impl TheaterGroup {
    /// Number of shows across all dates.
    pub fn show_count(&self) -> usize {
        self.dates.iter().map(|d| d.shows.len()).sum()
    }
}

/// Why a show could not be placed in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingTheater,
    MissingDate,
    UnparseableDate { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedShow {
    pub show_id: ShowId,
    pub reason: ExclusionReason,
}

/// Result of [`group_by_theater_then_date`].
///
/// Every input show is in exactly one date group or in `excluded`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShowGrouping {
    pub theaters: Vec<TheaterGroup>,
    pub excluded: Vec<ExcludedShow>,
}

impl ShowGrouping {
    /// Number of shows that were dropped from the display.
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Number of shows placed in groups.
    pub fn grouped_count(&self) -> usize {
        self.theaters.iter().map(TheaterGroup::show_count).sum()
    }

    /// True when no show could be displayed.
    pub fn is_empty(&self) -> bool {
        self.theaters.is_empty()
    }
}

/// Groups shows by theater, then by calendar date.
pub fn group_by_theater_then_date(shows: Vec<Show>) -> ShowGrouping {
    let mut grouping = ShowGrouping::default();
    let mut theater_index: HashMap<TheaterId, usize> = HashMap::new();

    for show in shows {
        let Some(theater) = show.theater.clone() else {
            grouping.excluded.push(ExcludedShow {
                show_id: show.id.clone(),
                reason: ExclusionReason::MissingTheater,
            });
            continue;
        };

        let date = match (show.show_date.as_deref(), show.calendar_date()) {
            (_, Some(date)) => date,
            (None, None) => {
                grouping.excluded.push(ExcludedShow {
                    show_id: show.id.clone(),
                    reason: ExclusionReason::MissingDate,
                });
                continue;
            }
            (Some(raw), None) => {
                grouping.excluded.push(ExcludedShow {
                    show_id: show.id.clone(),
                    reason: ExclusionReason::UnparseableDate {
                        raw: raw.to_string(),
                    },
                });
                continue;
            }
        };

        let slot = *theater_index.entry(theater.id.clone()).or_insert_with(|| {
            grouping.theaters.push(TheaterGroup {
                theater,
                dates: Vec::new(),
            });
            grouping.theaters.len() - 1
        });

        let dates = &mut grouping.theaters[slot].dates;
        match dates.iter_mut().find(|group| group.date == date) {
            Some(group) => group.shows.push(show),
            None => dates.push(DateGroup {
                date,
                shows: vec![show],
            }),
        }
    }

    grouping
}
