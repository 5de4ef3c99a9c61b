//! Trait and types for the remote scheduling API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::grid::TripRecord;

/// A bus driver known to the scheduler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
}

/// A city trips can depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
}

/// A trip submission. Serializes to the exact `POST /trip` body shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub driver_id: String,
    pub departure: String,
    pub destination: String,
    pub date: DateTime<Utc>,
    pub duration: u32,
}

impl NewTrip {
    /// Fails fast on fields the API would otherwise accept into a broken
    /// schedule: empty ids/names or a zero-hour duration.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.driver_id.trim().is_empty() {
            return Err(ScheduleError::Validation("driver id is empty".to_string()));
        }
        if self.departure.trim().is_empty() {
            return Err(ScheduleError::Validation(
                "departure city is empty".to_string(),
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(ScheduleError::Validation(
                "destination city is empty".to_string(),
            ));
        }
        if self.duration == 0 {
            return Err(ScheduleError::Validation(
                "trip duration must be at least one hour".to_string(),
            ));
        }
        Ok(())
    }
}

/// Abstraction over the remote scheduling service.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// Returns all drivers.
    async fn list_drivers(&self) -> Result<Vec<Driver>, ScheduleError>;

    /// Returns all cities.
    async fn list_cities(&self) -> Result<Vec<City>, ScheduleError>;

    /// Returns the driver's trips for the ISO week containing `date`.
    /// Implementations normalize `date` to Monday before issuing the request.
    async fn fetch_schedule(
        &self,
        driver_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TripRecord>, ScheduleError>;

    /// Submits a new trip. The response body, if any, is discarded.
    async fn create_trip(&self, trip: &NewTrip) -> Result<(), ScheduleError>;
}
