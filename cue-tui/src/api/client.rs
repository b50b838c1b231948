use anyhow::{Context, Result};
use propresenter::domain::{Timer, TimerOperation};
use propresenter::{ProPresenterClient, ProPresenterUrl};

use crate::api::dev_backend::DevBackend;
use crate::config::CueConfig;

/// The panel's view of the Remote Timer Service: either a real ProPresenter
/// host or the in-memory dev backend (`cue-tui dev`, tests).
pub enum ApiClient {
    Remote(ProPresenterClient),
    Dev(DevBackend),
}

impl ApiClient {
    pub fn new(config: &CueConfig) -> Result<Self> {
        let base = ProPresenterUrl::new(&config.host, config.port);
        let client = ProPresenterClient::new(base, config.request_timeout_secs)
            .context("Failed to build HTTP client")?;
        Ok(Self::Remote(client))
    }

    pub fn dev() -> Self {
        Self::Dev(DevBackend::new())
    }

    pub fn dev_backend(&self) -> Option<&DevBackend> {
        match self {
            ApiClient::Remote(_) => None,
            ApiClient::Dev(dev) => Some(dev),
        }
    }

    /// Full timer list with the live snapshot merged in.
    pub async fn fetch_timers(&self) -> Result<Vec<Timer>> {
        match self {
            ApiClient::Remote(client) => Ok(client.fetch_timers().await?),
            ApiClient::Dev(dev) => dev.timers(),
        }
    }

    pub async fn perform_operation(&self, uuid: &str, op: TimerOperation) -> Result<()> {
        match self {
            ApiClient::Remote(client) => Ok(client.perform_operation(uuid, op).await?),
            ApiClient::Dev(dev) => dev.apply_operation(uuid, op),
        }
    }

    pub async fn perform_bulk_operation(&self, op: TimerOperation) -> Result<()> {
        match self {
            ApiClient::Remote(client) => Ok(client.perform_bulk_operation(op).await?),
            ApiClient::Dev(dev) => dev.apply_bulk_operation(op),
        }
    }

    pub async fn create_timer(&self, duration_seconds: i64, name: &str) -> Result<Timer> {
        match self {
            ApiClient::Remote(client) => Ok(client.create_timer(duration_seconds, name).await?),
            ApiClient::Dev(dev) => dev.create_timer(duration_seconds, name),
        }
    }

    pub async fn edit_timer(&self, uuid: &str, duration_seconds: i64, name: &str) -> Result<Timer> {
        match self {
            ApiClient::Remote(client) => Ok(client.edit_timer(uuid, duration_seconds, name).await?),
            ApiClient::Dev(dev) => dev.edit_timer(uuid, duration_seconds, name),
        }
    }

    pub async fn delete_timer(&self, uuid: &str) -> Result<()> {
        match self {
            ApiClient::Remote(client) => Ok(client.delete_timer(uuid).await?),
            ApiClient::Dev(dev) => dev.delete_timer(uuid),
        }
    }
}
