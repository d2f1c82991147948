//! HTTP client for the booking backend

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use skybook_core::booking::{BackendMessage, ReservationRequest, SeatBlockRequest};
use skybook_core::occupancy::OccupiedBlock;
use skybook_core::repository::{OccupancySource, ReservationSink, SeatBlockSink, SeatMapSource};
use skybook_core::seat_map::SeatMapResponse;
use skybook_core::{AircraftId, AircraftSeatMap, CoreError, CoreResult, FlightId};
use crate::app_config::BackendConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    /// 4xx other than 401/404, usually a business rule on the backend side
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<BackendError> for CoreError {
    fn from(err: BackendError) -> Self {
        CoreError::Upstream(err.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.authorize(self.client.post(&url).json(body)).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(status_error(status, &text));
        }

        response.json().await.map_err(Into::into)
    }

    async fn seat_map(&self, path: &str) -> CoreResult<AircraftSeatMap> {
        let response: SeatMapResponse = self.get(path).await?;
        AircraftSeatMap::try_from(response)
    }
}

/// Map a non-2xx reply, preferring the backend's `message` field.
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<BackendMessage>(body)
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| format!("{} {}", status.as_u16(), body.trim()));

    match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        s if s.is_client_error() => BackendError::Rejected(message),
        _ => BackendError::Server(message),
    }
}

fn message_or(reply: BackendMessage, fallback: &str) -> String {
    reply.message.unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl SeatMapSource for BackendClient {
    async fn flight_seat_map(&self, flight_id: FlightId) -> CoreResult<AircraftSeatMap> {
        self.seat_map(&format!("/flight/{}/seat_map", flight_id)).await
    }

    async fn aircraft_seat_map(
        &self,
        airline_code: &str,
        aircraft_id: AircraftId,
    ) -> CoreResult<AircraftSeatMap> {
        self.seat_map(&format!("/airline/{}/aircraft/{}/seat_map", airline_code, aircraft_id))
            .await
    }
}

#[async_trait]
impl OccupancySource for BackendClient {
    async fn occupied_seats(&self, flight_id: FlightId) -> CoreResult<Vec<OccupiedBlock>> {
        Ok(self.get(&format!("/flight/{}/seats-occupied", flight_id)).await?)
    }
}

#[async_trait]
impl SeatBlockSink for BackendClient {
    async fn create_seat_block(
        &self,
        aircraft_id: AircraftId,
        request: &SeatBlockRequest,
    ) -> CoreResult<String> {
        let reply: BackendMessage = self
            .post(&format!("/airline/add/block/aircraft/{}", aircraft_id), request)
            .await?;
        Ok(message_or(reply, "Seat block added"))
    }
}

#[async_trait]
impl ReservationSink for BackendClient {
    async fn book(&self, request: &ReservationRequest) -> CoreResult<String> {
        let reply: BackendMessage = self.post("/flight/book", request).await?;
        Ok(message_or(reply, "Booking confirmed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            token: None,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joining() {
        let c = client("http://backend:8080/");
        assert_eq!(c.url("/flight/1/seat_map"), "http://backend:8080/flight/1/seat_map");
        assert_eq!(c.url("flight/book"), "http://backend:8080/flight/book");

        let c = client("http://backend:8080/api");
        assert_eq!(c.url("/flight/book"), "http://backend:8080/api/flight/book");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED, ""), BackendError::Unauthorized));

        match status_error(StatusCode::NOT_FOUND, r#"{"message":"Flight not found"}"#) {
            BackendError::NotFound(msg) => assert_eq!(msg, "Flight not found"),
            other => panic!("unexpected {:?}", other),
        }

        match status_error(StatusCode::CONFLICT, r#"{"message":"Seat already booked"}"#) {
            BackendError::Rejected(msg) => assert_eq!(msg, "Seat already booked"),
            other => panic!("unexpected {:?}", other),
        }

        match status_error(StatusCode::BAD_GATEWAY, "upstream down") {
            BackendError::Server(msg) => assert_eq!(msg, "502 upstream down"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_errors_become_upstream() {
        let err: CoreError = BackendError::Rejected("Seat already booked".to_string()).into();
        assert!(matches!(err, CoreError::Upstream(msg) if msg.contains("Seat already booked")));
    }
}
