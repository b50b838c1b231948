use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::domain::{
    parse_clock_time, Countdown, CreateTimerPayload, EditTimerId, EditTimerPayload, Timer,
    TimerOperation,
};
use crate::ProPresenterUrl;

/// Default per-request timeout. A hung remote must not wedge the caller: the
/// panel's in-flight guard is only released once the call resolves.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

pub struct ProPresenterClient {
    http: reqwest::Client,
    base: ProPresenterUrl,
    timeout_secs: u64,
}

impl ProPresenterClient {
    pub fn new(base: ProPresenterUrl, timeout_secs: u64) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base,
            timeout_secs,
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        call: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout_secs)
                } else {
                    ApiError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(call, %status, "remote returned error status");
            return Err(ApiError::Status {
                call,
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
        call: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.get(url.as_ref()), call).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(format!("{}: {}", call, e)))
    }

    async fn send_without_body(
        &self,
        request: reqwest::RequestBuilder,
        call: &'static str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    #[instrument(name = "GET /v1/timers", skip(self))]
    pub async fn list_timers(&self) -> Result<Vec<Timer>, ApiError> {
        let url = self.base.append_path("/timers").without_chunking();
        self.fetch(url, "GET /v1/timers").await
    }

    #[instrument(name = "GET /v1/timers/current", skip(self))]
    pub async fn current_timers(&self) -> Result<Vec<Timer>, ApiError> {
        let url = self.base.append_path("/timers/current").without_chunking();
        self.fetch(url, "GET /v1/timers/current").await
    }

    /// Full timer list with the live snapshot overlaid: state and clock
    /// reading come from `/timers/current`, and `remaining_seconds` is parsed
    /// out of each current timer's reported clock string.
    pub async fn fetch_timers(&self) -> Result<Vec<Timer>, ApiError> {
        let (all, current) = tokio::try_join!(self.list_timers(), self.current_timers())?;
        merge_current(all, current)
    }

    #[instrument(name = "POST /v1/timers", skip(self))]
    pub async fn create_timer(&self, duration_seconds: i64, name: &str) -> Result<Timer, ApiError> {
        let url = self.base.append_path("/timers");
        let body = CreateTimerPayload {
            allows_overrun: true,
            countdown: Countdown {
                duration: duration_seconds,
            },
            name: name.to_string(),
        };

        let response = self
            .send(self.http.post(url.as_ref()).json(&body), "POST /v1/timers")
            .await?;
        response
            .json::<Timer>()
            .await
            .map_err(|e| ApiError::Parse(format!("POST /v1/timers: {}", e)))
    }

    #[instrument(name = "PUT /v1/timer/:id", skip(self))]
    pub async fn edit_timer(
        &self,
        uuid: &str,
        duration_seconds: i64,
        name: &str,
    ) -> Result<Timer, ApiError> {
        let url = self.base.append_path(&format!("/timer/{}", uuid));
        let body = EditTimerPayload {
            allows_overrun: true,
            countdown: Countdown {
                duration: duration_seconds,
            },
            id: EditTimerId {
                name: name.to_string(),
            },
        };

        let response = self
            .send(self.http.put(url.as_ref()).json(&body), "PUT /v1/timer/:id")
            .await?;
        response
            .json::<Timer>()
            .await
            .map_err(|e| ApiError::Parse(format!("PUT /v1/timer/:id: {}", e)))
    }

    #[instrument(name = "DELETE /v1/timer/:id", skip(self))]
    pub async fn delete_timer(&self, uuid: &str) -> Result<(), ApiError> {
        let url = self.base.append_path(&format!("/timer/{}", uuid));
        self.send_without_body(self.http.delete(url.as_ref()), "DELETE /v1/timer/:id")
            .await
    }

    /// The operation endpoints are plain GETs on the remote.
    #[instrument(name = "timer operation", skip(self))]
    pub async fn perform_operation(&self, uuid: &str, op: TimerOperation) -> Result<(), ApiError> {
        let url = self.base.append_path(&format!("/timer/{}/{}", uuid, op));
        self.send_without_body(self.http.get(url.as_ref()), "GET /v1/timer/:id/:operation")
            .await
    }

    #[instrument(name = "bulk timer operation", skip(self))]
    pub async fn perform_bulk_operation(&self, op: TimerOperation) -> Result<(), ApiError> {
        let url = self.base.append_path(&format!("/timers/{}", op));
        self.send_without_body(self.http.get(url.as_ref()), "GET /v1/timers/:operation")
            .await
    }
}

/// Overlay the current-timers snapshot onto the full list. Current records
/// carry the authoritative state and clock reading; the configured countdown
/// falls back to the list record when the snapshot omits it.
fn merge_current(all: Vec<Timer>, current: Vec<Timer>) -> Result<Vec<Timer>, ApiError> {
    let mut current_by_uuid: HashMap<String, Timer> = HashMap::new();
    for mut timer in current {
        timer.remaining_seconds = parse_clock_time(&timer.time)
            .map_err(|e| ApiError::Parse(format!("GET /v1/timers/current: {}", e)))?;
        current_by_uuid.insert(timer.id.uuid.clone(), timer);
    }

    Ok(all
        .into_iter()
        .map(|timer| match current_by_uuid.remove(&timer.id.uuid) {
            Some(mut live) => {
                live.countdown = live.countdown.or(timer.countdown);
                live
            }
            None => timer,
        })
        .collect())
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} - check the configured ProPresenter host and port")]
    Transport(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("{call} returned status {status}")]
    Status { call: &'static str, status: u16 },
    #[error("failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimerId, TimerState};

    fn listed(uuid: &str, name: &str, duration: i64) -> Timer {
        Timer {
            id: TimerId {
                index: 0,
                name: name.to_string(),
                uuid: uuid.to_string(),
            },
            allows_overrun: true,
            countdown: Some(Countdown { duration }),
            state: TimerState::Stopped,
            time: String::new(),
            remaining_seconds: 0,
        }
    }

    fn snapshot(uuid: &str, state: TimerState, time: &str) -> Timer {
        Timer {
            id: TimerId {
                index: 0,
                name: String::new(),
                uuid: uuid.to_string(),
            },
            allows_overrun: true,
            countdown: None,
            state,
            time: time.to_string(),
            remaining_seconds: 0,
        }
    }

    #[test]
    fn merge_overlays_live_state_and_derives_remaining() {
        let all = vec![listed("a", "Sermon", 1800), listed("b", "Worship", 600)];
        let current = vec![snapshot("a", TimerState::Running, "00:12:30")];

        let merged = merge_current(all, current).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].state, TimerState::Running);
        assert_eq!(merged[0].remaining_seconds, 750);
        // Countdown config comes from the list record.
        assert_eq!(merged[0].duration_seconds(), Some(1800));
        assert_eq!(merged[1].state, TimerState::Stopped);
    }

    #[test]
    fn merge_keeps_overrun_reading_negative() {
        let all = vec![listed("a", "Sermon", 300)];
        let current = vec![snapshot("a", TimerState::Overrunning, "-00:00:45")];

        let merged = merge_current(all, current).unwrap();
        assert_eq!(merged[0].remaining_seconds, -45);
        assert_eq!(merged[0].state, TimerState::Overrunning);
    }

    #[test]
    fn merge_rejects_malformed_clock_reading() {
        let all = vec![listed("a", "Sermon", 300)];
        let current = vec![snapshot("a", TimerState::Running, "not-a-time")];

        assert!(merge_current(all, current).is_err());
    }

    #[test]
    fn timer_deserializes_from_remote_payload() {
        let raw = r#"{
            "id": {"index": 0, "name": "Sermon", "uuid": "47E8B48C"},
            "allows_overrun": true,
            "countdown": {"duration": 1800},
            "state": "overrunning",
            "time": "-00:01:05"
        }"#;

        let timer: Timer = serde_json::from_str(raw).unwrap();
        assert_eq!(timer.state, TimerState::Overrunning);
        assert_eq!(timer.duration_seconds(), Some(1800));
        assert_eq!(timer.remaining_seconds, 0);
    }
}
