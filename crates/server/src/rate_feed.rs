//! Periodic exchange-rate refresh.
//!
//! A [`RateSource`] produces rate snapshots; the refresh task replaces the
//! shared table wholesale on every successful fetch (last-write-wins) and
//! keeps the previous snapshot on failure, so a flaky source can only make
//! rates stale, never absent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use engine::{Currency, RateTable};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum RateFeedError {
    #[error("invalid rates url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid rates payload: {0}")]
    Payload(String),
}

/// Anything that can produce a full rate snapshot.
pub trait RateSource: Send + Sync + 'static {
    fn fetch(
        &self,
    ) -> impl std::future::Future<Output = Result<RateTable, RateFeedError>> + Send;
}

/// Wire format of the external rate service:
/// `{"base": "USD", "rates": {"EUR": 0.9, ...}}`.
#[derive(Debug, Deserialize)]
struct RatesPayload {
    base: String,
    rates: HashMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct HttpRateSource {
    url: Url,
    http: reqwest::Client,
}

impl HttpRateSource {
    pub fn new(url: &str) -> Result<Self, RateFeedError> {
        let url = Url::parse(url).map_err(|err| RateFeedError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            url,
            http: reqwest::Client::new(),
        })
    }
}

impl RateSource for HttpRateSource {
    async fn fetch(&self) -> Result<RateTable, RateFeedError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let payload: RatesPayload = response.json().await?;

        let base = Currency::try_from(payload.base.as_str()).map_err(|_| {
            RateFeedError::Payload(format!("unsupported base currency: {}", payload.base))
        })?;

        let mut entries = Vec::with_capacity(payload.rates.len());
        for (code, rate) in payload.rates {
            match Currency::try_from(code.as_str()) {
                Ok(currency) => entries.push((currency, rate)),
                Err(_) => tracing::warn!("skipping unsupported currency in rates payload: {code}"),
            }
        }

        Ok(RateTable::new(base, entries, Utc::now()))
    }
}

/// Spawns the refresh loop. The first fetch runs immediately, then every
/// `interval`.
pub fn spawn_refresh<S: RateSource>(
    source: S,
    rates: Arc<RwLock<Option<RateTable>>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match source.fetch().await {
                Ok(table) => {
                    tracing::debug!(
                        "rate table refreshed: base {}, {} entries",
                        table.base(),
                        table.entries().count()
                    );
                    *rates.write().await = Some(table);
                }
                Err(err) => {
                    tracing::warn!("rate refresh failed, keeping previous snapshot: {err}");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(Vec<(Currency, f64)>);

    impl RateSource for StaticSource {
        async fn fetch(&self) -> Result<RateTable, RateFeedError> {
            Ok(RateTable::new(
                Currency::Usd,
                self.0.iter().copied(),
                Utc::now(),
            ))
        }
    }

    struct FailingSource;

    impl RateSource for FailingSource {
        async fn fetch(&self) -> Result<RateTable, RateFeedError> {
            Err(RateFeedError::Payload("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn refresh_installs_the_snapshot() {
        let rates = Arc::new(RwLock::new(None));
        let handle = spawn_refresh(
            StaticSource(vec![(Currency::Eur, 0.9)]),
            rates.clone(),
            Duration::from_secs(3600),
        );

        // The first tick fires immediately; poll until it lands.
        for _ in 0..50 {
            if rates.read().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        let guard = rates.read().await;
        let table = guard.as_ref().unwrap();
        assert_eq!(table.base(), Currency::Usd);
        assert_eq!(table.rate(Currency::Eur), Some(0.9));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_previous_snapshot() {
        let initial = RateTable::new(Currency::Usd, [(Currency::Eur, 0.9)], Utc::now());
        let rates = Arc::new(RwLock::new(Some(initial)));
        let handle = spawn_refresh(FailingSource, rates.clone(), Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        let guard = rates.read().await;
        assert!(guard.is_some());
        assert_eq!(guard.as_ref().unwrap().rate(Currency::Eur), Some(0.9));
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            HttpRateSource::new("not a url"),
            Err(RateFeedError::InvalidUrl(_))
        ));
    }
}
