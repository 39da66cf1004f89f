pub mod error;

pub use error::{MeetupError, Result};

use encore_common::EventRecord;
use serde::Deserialize;

const BASE_URL: &str = "https://api.meetup.com";

/// Wire shape of the upcoming-events endpoint. The `events` key is absent
/// when the search matches nothing.
#[derive(Debug, Deserialize)]
struct UpcomingEventsResponse {
    #[serde(default)]
    events: Vec<EventRecord>,
}

pub struct MeetupClient {
    client: reqwest::Client,
    api_key: String,
}

impl MeetupClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Fetch upcoming events near a lat/lng point, newest-first order as
    /// returned by the API. `limit` caps the result count.
    pub async fn upcoming_events(&self, lat: f64, lng: f64, limit: u32) -> Result<Vec<EventRecord>> {
        let url = format!("{BASE_URL}/find/upcoming_events");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lng.to_string()),
                ("page", limit.to_string()),
                ("sign", "true".to_string()),
                ("photo-host", "public".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MeetupError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: UpcomingEventsResponse = resp.json().await?;
        tracing::debug!(count = parsed.events.len(), "Fetched upcoming events");
        Ok(parsed.events)
    }
}
