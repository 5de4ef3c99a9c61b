//! HTTP execution seam.
//!
//! [`HttpClient`] is the narrow trait the API client talks through, so tests
//! can substitute a canned-response implementation for the real network.

use async_trait::async_trait;
use reqwest::{Request, Response};
use std::time::Duration;

use crate::error::ScheduleError;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// [`HttpClient`] backed by a shared [`reqwest::Client`] with request and
/// connect timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self, ScheduleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}
