//! Intervals.icu API client
//!
//! Two calls only: read the athlete's wellness (CTL/ATL) for a date and
//! create a planned workout event. Auth is HTTP Basic with the literal user
//! `API_KEY` and the athlete's key as password.

use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use std::time::Duration as StdDuration;
use url::Url;

use crate::models::{FitnessState, WorkoutObject};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const INTERVALS_BASE_URL: &str = "https://intervals.icu";
const API_PATH: &str = "api/v1/athlete";
const BASIC_AUTH_USER: &str = "API_KEY";
const REQUEST_TIMEOUT_SECONDS: u64 = 10;

pub const ATHLETE_ID_VAR: &str = "ATHLETE_ID";
pub const API_KEY_VAR: &str = "API_KEY";

/// ---------------------------------------------------------------------------
/// Credentials
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct IntervalsCredentials {
  pub athlete_id: String,
  pub api_key: String,
}

impl IntervalsCredentials {
  pub fn from_env() -> Result<Self, IntervalsError> {
    Ok(Self {
      athlete_id: required_var(ATHLETE_ID_VAR)?,
      api_key: required_var(API_KEY_VAR)?,
    })
  }
}

fn required_var(name: &str) -> Result<String, IntervalsError> {
  env::var(name)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| IntervalsError::MissingConfig(name.into()))
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IntervalsError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid API base URL: {0}")]
  BaseUrl(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("API error {status}: {body}")]
  Api { status: StatusCode, body: String },

  #[error("Wellness for {0} has no CTL/ATL data")]
  IncompleteState(NaiveDate),
}

impl IntervalsError {
  /// Server response body, when the server sent one
  pub fn response_body(&self) -> Option<&str> {
    match self {
      IntervalsError::Api { body, .. } if !body.is_empty() => Some(body.as_str()),
      _ => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// API Data Structures
/// ---------------------------------------------------------------------------

/// Subset of `GET /athlete/{id}/wellness/{date}` we rely on
#[derive(Debug, Deserialize)]
pub struct WellnessResponse {
  #[serde(default)]
  pub ctl: Option<f64>,
  #[serde(default)]
  pub atl: Option<f64>,
}

impl WellnessResponse {
  pub fn into_state(self, date: NaiveDate) -> Result<FitnessState, IntervalsError> {
    match (self.ctl, self.atl) {
      (Some(ctl), Some(atl)) => Ok(FitnessState::new(ctl, atl)),
      _ => Err(IntervalsError::IncompleteState(date)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

pub struct IntervalsClient {
  client: Client,
  athlete_url: String,
  api_key: String,
}

impl IntervalsClient {
  pub fn new(credentials: &IntervalsCredentials) -> Result<Self, IntervalsError> {
    Self::with_base_url(credentials, INTERVALS_BASE_URL)
  }

  /// Point the client at another host (used by tests against a mock server)
  pub fn with_base_url(
    credentials: &IntervalsCredentials,
    base_url: &str,
  ) -> Result<Self, IntervalsError> {
    let base = Url::parse(base_url).map_err(|e| IntervalsError::BaseUrl(e.to_string()))?;
    let athlete_url = format!(
      "{}/{}/{}",
      base.as_str().trim_end_matches('/'),
      API_PATH,
      credentials.athlete_id
    );

    let client = Client::builder()
      .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECONDS))
      .build()?;

    Ok(Self {
      client,
      athlete_url,
      api_key: credentials.api_key.clone(),
    })
  }

  /// Fetch CTL/ATL for `date`. Missing values are an error: nothing can be
  /// planned without both.
  pub async fn fetch_fitness_state(&self, date: NaiveDate) -> Result<FitnessState, IntervalsError> {
    let url = format!("{}/wellness/{}", self.athlete_url, date.format("%Y-%m-%d"));

    let response = self
      .client
      .get(&url)
      .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(IntervalsError::Api { status, body });
    }

    let wellness: WellnessResponse = response.json().await?;
    wellness.into_state(date)
  }

  /// Create a planned workout on the athlete's calendar
  pub async fn create_workout(
    &self,
    workout: &WorkoutObject,
  ) -> Result<serde_json::Value, IntervalsError> {
    let url = format!("{}/events", self.athlete_url);

    let response = self
      .client
      .post(&url)
      .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
      .json(workout)
      .send()
      .await?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(IntervalsError::Api { status, body });
    }

    let created = response.text().await?;
    match serde_json::from_str(&created) {
      Ok(value) => Ok(value),
      Err(e) => {
        tracing::debug!(
          name = %workout.name,
          error = %e,
          body = %created,
          "Event created, response was not JSON"
        );
        Ok(serde_json::Value::Null)
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
