//! Weekly schedule grid construction.
//!
//! Buckets a flat list of trips into per-weekday placements for a
//! 7-day-by-24-hour view. A trip that runs past midnight produces a second
//! placement starting at hour 0 on the weekday it ends on.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ScheduleError;

/// ISO weekday number: Monday = 1 … Sunday = 7.
pub type WeekdayIndex = u8;

/// A single scheduled trip, as returned by the scheduling API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub departure_time: DateTime<Utc>,
    pub duration_hours: u32,
    pub departure_name: String,
    pub destination_name: String,
}

/// One card's position and size on the weekly grid.
///
/// `span_hours` is the portion of the trip visible in this weekday's column;
/// `total_duration_hours` is the trip's full duration and is the same on
/// both cards of a split trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPlacement {
    pub weekday: WeekdayIndex,
    pub start_hour: u32,
    pub span_hours: u32,
    pub total_duration_hours: u32,
    pub date: DateTime<Utc>,
    pub departure_name: String,
    pub destination_name: String,
}

/// Placements grouped by weekday. Weekdays without trips are absent.
pub type WeekGrid = BTreeMap<WeekdayIndex, Vec<GridPlacement>>;

fn weekday_index(t: &DateTime<Utc>) -> WeekdayIndex {
    // number_from_monday already maps Sunday to 7
    t.weekday().number_from_monday() as WeekdayIndex
}

fn validate(trip: &TripRecord) -> Result<(), ScheduleError> {
    if trip.duration_hours == 0 {
        return Err(ScheduleError::Validation(format!(
            "trip departing {} has zero duration",
            trip.departure_time
        )));
    }
    if trip.departure_name.trim().is_empty() {
        return Err(ScheduleError::Validation(format!(
            "trip departing {} has an empty departure name",
            trip.departure_time
        )));
    }
    if trip.destination_name.trim().is_empty() {
        return Err(ScheduleError::Validation(format!(
            "trip departing {} has an empty destination name",
            trip.departure_time
        )));
    }
    Ok(())
}

/// Buckets `trips` into a [`WeekGrid`].
///
/// A trip yields one placement when it starts and ends on the same weekday,
/// or when it ends exactly at midnight of the next day. Otherwise it also
/// yields an overflow placement on the end weekday, starting at hour 0 and
/// spanning the hours past midnight. The primary placement always spans the
/// full duration, so a split trip shows the same total on both cards.
///
/// Pure and deterministic; fails fast on zero durations or empty names.
pub fn build_week_grid(trips: &[TripRecord]) -> Result<WeekGrid, ScheduleError> {
    let mut grid = WeekGrid::new();

    for trip in trips {
        validate(trip)?;

        let start_weekday = weekday_index(&trip.departure_time);
        let end_time = trip.departure_time + Duration::hours(i64::from(trip.duration_hours));
        let end_weekday = weekday_index(&end_time);

        if end_weekday != start_weekday {
            // Hours past midnight the tail consumes on the new day. Zero
            // means the trip ends exactly at midnight and nothing spills.
            let overflow_hours = end_time.hour();
            if overflow_hours > 0 {
                grid.entry(end_weekday).or_default().push(GridPlacement {
                    weekday: end_weekday,
                    start_hour: 0,
                    span_hours: overflow_hours,
                    total_duration_hours: trip.duration_hours,
                    date: end_time,
                    departure_name: trip.departure_name.clone(),
                    destination_name: trip.destination_name.clone(),
                });
            }
        }

        grid.entry(start_weekday).or_default().push(GridPlacement {
            weekday: start_weekday,
            start_hour: trip.departure_time.hour(),
            span_hours: trip.duration_hours,
            total_duration_hours: trip.duration_hours,
            date: trip.departure_time,
            departure_name: trip.departure_name.clone(),
            destination_name: trip.destination_name.clone(),
        });
    }

    Ok(grid)
}
