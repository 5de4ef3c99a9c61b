//! Concrete client for the remote scheduling API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ScheduleError;
use crate::fetch::HttpClient;
use crate::grid::TripRecord;
use crate::services::scheduling_api::{City, Driver, NewTrip, SchedulingApi};
use crate::view::week_start;

#[derive(Deserialize)]
struct DriversResponse {
    drivers: Vec<Driver>,
}

#[derive(Deserialize)]
struct CitiesResponse {
    cities: Vec<City>,
}

#[derive(Deserialize)]
struct ScheduleResponse {
    trips: Vec<WireTrip>,
}

/// A trip as the API serializes it: snake_case fields, nested place objects.
#[derive(Deserialize)]
struct WireTrip {
    departure_time: DateTime<Utc>,
    duration: u32,
    departure: WirePlace,
    destination: WirePlace,
}

#[derive(Deserialize)]
struct WirePlace {
    name: String,
}

impl From<WireTrip> for TripRecord {
    fn from(wire: WireTrip) -> Self {
        TripRecord {
            departure_time: wire.departure_time,
            duration_hours: wire.duration,
            departure_name: wire.departure.name,
            destination_name: wire.destination.name,
        }
    }
}

fn decode_schedule(body: &str) -> Result<Vec<TripRecord>, ScheduleError> {
    let response: ScheduleResponse = serde_json::from_str(body)
        .map_err(|e| ScheduleError::Payload(format!("decoding schedule response: {e}")))?;
    Ok(response.trips.into_iter().map(TripRecord::from).collect())
}

/// Query path for one driver's week, with the date normalized to Monday
/// 00:00:00 UTC and formatted the way `Date.toISOString()` would.
fn schedule_path(driver_id: &str, date: NaiveDate) -> String {
    let monday = week_start(date).and_time(NaiveTime::MIN).and_utc();
    format!(
        "/schedule?driverId={}&date={}",
        driver_id,
        monday.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// [`SchedulingApi`] implementation over HTTP, generic over the transport so
/// tests can run it without a network.
pub struct SchedulerClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> SchedulerClient<C> {
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path_and_query: &str) -> Result<Url, ScheduleError> {
        let raw = format!("{}{}", self.base_url, path_and_query);
        raw.parse()
            .map_err(|e| ScheduleError::Validation(format!("invalid API URL {raw}: {e}")))
    }

    async fn execute(&self, req: Request) -> Result<String, ScheduleError> {
        let method = req.method().clone();
        let url = req.url().clone();
        let resp = self.http.execute(req).await?;

        let status = resp.status();
        debug!(%method, %url, status = status.as_u16(), "API request completed");
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ScheduleError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(resp.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ScheduleError> {
        let req = Request::new(Method::GET, self.url(path_and_query)?);
        let body = self.execute(req).await?;
        serde_json::from_str(&body)
            .map_err(|e| ScheduleError::Payload(format!("decoding {path_and_query}: {e}")))
    }
}

#[async_trait]
impl<C: HttpClient> SchedulingApi for SchedulerClient<C> {
    async fn list_drivers(&self) -> Result<Vec<Driver>, ScheduleError> {
        let response: DriversResponse = self.get_json("/drivers").await?;
        Ok(response.drivers)
    }

    async fn list_cities(&self) -> Result<Vec<City>, ScheduleError> {
        let response: CitiesResponse = self.get_json("/cities").await?;
        Ok(response.cities)
    }

    async fn fetch_schedule(
        &self,
        driver_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TripRecord>, ScheduleError> {
        let path = schedule_path(driver_id, date);
        let body = self.execute(Request::new(Method::GET, self.url(&path)?)).await?;
        decode_schedule(&body)
    }

    async fn create_trip(&self, trip: &NewTrip) -> Result<(), ScheduleError> {
        trip.validate()?;

        let mut req = Request::new(Method::POST, self.url("/trip")?);
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = serde_json::to_vec(trip)
            .map_err(|e| ScheduleError::Payload(format!("encoding trip body: {e}")))?;
        *req.body_mut() = Some(body.into());

        // response body is not consumed
        self.execute(req).await?;
        Ok(())
    }
}
