//! View state and fetch coordination for the weekly schedule display.
//!
//! [`ViewState`] is the explicit "selected driver and week" pair; nothing
//! reads it ambiently. [`ScheduleController`] serializes fetches: navigation
//! is refused while a request is outstanding, and every response carries the
//! Monday it was issued for so a superseded week can be discarded instead of
//! racing the current one.

use chrono::{Days, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::grid::{self, WeekGrid};
use crate::services::scheduling_api::SchedulingApi;

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// The currently selected driver and reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub driver_id: String,
    pub reference_date: NaiveDate,
}

impl ViewState {
    pub fn new(driver_id: impl Into<String>, reference_date: NaiveDate) -> Self {
        Self {
            driver_id: driver_id.into(),
            reference_date,
        }
    }

    /// Monday of the displayed week.
    pub fn week_start(&self) -> NaiveDate {
        week_start(self.reference_date)
    }

    /// Sunday of the displayed week.
    pub fn week_end(&self) -> NaiveDate {
        self.week_start() + Days::new(6)
    }

    /// Header label, e.g. `24.08.2026 - 30.08.2026`.
    pub fn week_label(&self) -> String {
        format!(
            "{} - {}",
            self.week_start().format("%d.%m.%Y"),
            self.week_end().format("%d.%m.%Y")
        )
    }
}

/// A fetched and bucketed week, tagged with the Monday it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSchedule {
    pub week: NaiveDate,
    pub grid: WeekGrid,
}

/// Owns the view state and coordinates schedule fetches against it.
pub struct ScheduleController<A> {
    api: A,
    state: ViewState,
    busy: bool,
}

impl<A: SchedulingApi> ScheduleController<A> {
    pub fn new(api: A, state: ViewState) -> Self {
        Self {
            api,
            state,
            busy: false,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Moves the view one week back. Returns `false` (and leaves the state
    /// untouched) while a fetch is outstanding.
    pub fn previous_week(&mut self) -> bool {
        self.shift_weeks(-1)
    }

    /// Moves the view one week forward. Same locking rule as
    /// [`previous_week`](Self::previous_week).
    pub fn next_week(&mut self) -> bool {
        self.shift_weeks(1)
    }

    fn shift_weeks(&mut self, weeks: i64) -> bool {
        if self.busy {
            warn!(weeks, "week navigation ignored while a fetch is outstanding");
            return false;
        }
        self.state.reference_date = self.state.reference_date + Duration::weeks(weeks);
        debug!(week = %self.state.week_start(), "week selected");
        true
    }

    /// Switches the selected driver. Refused while a fetch is outstanding.
    pub fn select_driver(&mut self, driver_id: impl Into<String>) -> bool {
        if self.busy {
            warn!("driver selection ignored while a fetch is outstanding");
            return false;
        }
        self.state.driver_id = driver_id.into();
        true
    }

    /// Fetches and buckets one week for the selected driver, tagging the
    /// result with the Monday it targets.
    pub async fn load(&self, week: NaiveDate) -> Result<WeekSchedule, ScheduleError> {
        let week = week_start(week);
        let trips = self.api.fetch_schedule(&self.state.driver_id, week).await?;
        debug!(trip_count = trips.len(), week = %week, "schedule fetched");
        let grid = grid::build_week_grid(&trips)?;
        Ok(WeekSchedule { week, grid })
    }

    /// Accepts a completed fetch, or discards it when the selected week has
    /// moved on since the request was issued.
    pub fn apply(&self, schedule: WeekSchedule) -> Option<WeekGrid> {
        if schedule.week != self.state.week_start() {
            info!(
                stale_week = %schedule.week,
                current_week = %self.state.week_start(),
                "discarding stale schedule response"
            );
            return None;
        }
        Some(schedule.grid)
    }

    /// Fetches the currently selected week and applies it.
    ///
    /// The busy flag locks navigation for the duration of the request and is
    /// cleared on success and failure alike, so controls never stay stuck
    /// after a failed fetch. `Ok(None)` means the response was stale.
    pub async fn refresh(&mut self) -> Result<Option<WeekGrid>, ScheduleError> {
        let week = self.state.week_start();
        self.busy = true;
        let result = self.load(week).await;
        self.busy = false;

        Ok(self.apply(result?))
    }

    #[cfg(test)]
    fn force_busy(&mut self) {
        self.busy = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TripRecord;
    use crate::services::scheduling_api::{City, Driver, NewTrip};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves a fixed trip list and records the weeks it was asked for.
    struct FixedApi {
        trips: Vec<TripRecord>,
        fail: bool,
        requested_weeks: Mutex<Vec<NaiveDate>>,
    }

    impl FixedApi {
        fn with_trips(trips: Vec<TripRecord>) -> Self {
            Self {
                trips,
                fail: false,
                requested_weeks: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                trips: Vec::new(),
                fail: true,
                requested_weeks: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SchedulingApi for FixedApi {
        async fn list_drivers(&self) -> Result<Vec<Driver>, ScheduleError> {
            Ok(Vec::new())
        }

        async fn list_cities(&self) -> Result<Vec<City>, ScheduleError> {
            Ok(Vec::new())
        }

        async fn fetch_schedule(
            &self,
            _driver_id: &str,
            date: NaiveDate,
        ) -> Result<Vec<TripRecord>, ScheduleError> {
            self.requested_weeks.lock().unwrap().push(date);
            if self.fail {
                return Err(ScheduleError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(self.trips.clone())
        }

        async fn create_trip(&self, _trip: &NewTrip) -> Result<(), ScheduleError> {
            Ok(())
        }
    }

    fn wednesday_trip() -> TripRecord {
        TripRecord {
            departure_time: "2026-08-26T09:00:00Z".parse().unwrap(),
            duration_hours: 2,
            departure_name: "Zagreb".to_string(),
            destination_name: "Split".to_string(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        assert_eq!(week_start(date("2026-08-27")), date("2026-08-24"));
        assert_eq!(week_start(date("2026-08-24")), date("2026-08-24"));
        // Sunday still belongs to the week that started the previous Monday
        assert_eq!(week_start(date("2026-08-30")), date("2026-08-24"));
    }

    #[test]
    fn test_week_label_format() {
        let state = ViewState::new("d1", date("2026-08-27"));
        assert_eq!(state.week_label(), "24.08.2026 - 30.08.2026");
    }

    #[tokio::test]
    async fn test_refresh_returns_bucketed_week() {
        let api = FixedApi::with_trips(vec![wednesday_trip()]);
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        let grid = controller.refresh().await.unwrap().unwrap();
        assert_eq!(grid[&3].len(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_refresh_requests_the_monday_of_the_selected_week() {
        let api = FixedApi::with_trips(Vec::new());
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        controller.refresh().await.unwrap();
        let weeks = controller.api.requested_weeks.lock().unwrap().clone();
        assert_eq!(weeks, vec![date("2026-08-24")]);
    }

    #[tokio::test]
    async fn test_refresh_unlocks_controls_on_failure() {
        let api = FixedApi::failing();
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        let err = controller.refresh().await.unwrap_err();
        assert!(matches!(err, ScheduleError::Api { status: 500, .. }));
        assert!(!controller.is_busy());
        assert!(controller.next_week());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let api = FixedApi::with_trips(vec![wednesday_trip()]);
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        let schedule = controller.load(controller.state().week_start()).await.unwrap();
        assert!(controller.next_week());

        assert!(controller.apply(schedule).is_none());
    }

    #[tokio::test]
    async fn test_matching_response_is_applied() {
        let api = FixedApi::with_trips(vec![wednesday_trip()]);
        let controller = ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        let schedule = controller.load(controller.state().week_start()).await.unwrap();
        let grid = controller.apply(schedule).unwrap();
        assert!(grid.contains_key(&3));
    }

    #[test]
    fn test_navigation_is_locked_while_busy() {
        let api = FixedApi::with_trips(Vec::new());
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        controller.force_busy();
        let before = controller.state().clone();

        assert!(!controller.next_week());
        assert!(!controller.previous_week());
        assert!(!controller.select_driver("d2"));
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_navigation_shifts_exactly_one_week() {
        let api = FixedApi::with_trips(Vec::new());
        let mut controller =
            ScheduleController::new(api, ViewState::new("d1", date("2026-08-27")));

        assert!(controller.next_week());
        assert_eq!(controller.state().week_start(), date("2026-08-31"));
        assert!(controller.previous_week());
        assert_eq!(controller.state().week_start(), date("2026-08-24"));
    }
}
