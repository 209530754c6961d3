use super::config::FetchConfig;
use super::{DetailFetch, ListingFetch, Page};
use crate::core::{GameMode, Result, SyncError, value};
use crate::storage::RawPayload;
use async_trait::async_trait;
use log::warn;
use serde_json::Value;

/// `reqwest`-backed fetcher for the upstream leaderboard API.
///
/// The service answers POST requests carrying its filters as query
/// parameters and wraps every response in a `data` envelope.
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate().map_err(SyncError::Config)?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| SyncError::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn listing_url(&self) -> String {
        format!("{}/getLeaderboard", self.config.base_url)
    }

    fn detail_url(&self) -> String {
        format!("{}/getAdditionalStats", self.config.base_url)
    }

    async fn post_for_data(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let mut body: Value = response.json().await?;
        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(SyncError::Transport(format!(
                "Response from {} is missing the 'data' envelope",
                url
            ))),
        }
    }
}

#[async_trait]
impl ListingFetch for HttpFetcher {
    async fn fetch_page(&self, mode: GameMode, page: u32) -> Result<Page> {
        let params = [
            ("map", self.config.map_filter.clone()),
            ("mode", mode.code().to_string()),
            ("page", page.to_string()),
            ("pagesize", self.config.page_size.to_string()),
            ("season", self.config.season.to_string()),
            ("type", self.config.account_type.clone()),
        ];
        let data = self.post_for_data(&self.listing_url(), &params).await?;

        let entries = match data.get("resultset").and_then(Value::as_array) {
            Some(rows) => rows
                .iter()
                .filter_map(|row| match row.as_object() {
                    Some(obj) => Some(obj.clone()),
                    None => {
                        warn!("dropping non-object listing row on page {} of {}", page, mode);
                        None
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let total_pages = data
            .get("pagecount")
            .and_then(value::as_i64)
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                SyncError::Transport(format!(
                    "Listing page {} of {} carries no usable 'pagecount'",
                    page, mode
                ))
            })? as u32;
        let total_rows = data
            .get("totalrows")
            .and_then(value::as_i64)
            .unwrap_or(0)
            .max(0) as u32;

        Ok(Page {
            entries,
            total_pages,
            total_rows,
        })
    }
}

#[async_trait]
impl DetailFetch for HttpFetcher {
    async fn fetch_detail(&self, mode: GameMode, handle: &str) -> Result<RawPayload> {
        let params = [
            ("map", self.config.map_filter.clone()),
            ("mode", mode.code().to_string()),
            ("handle", handle.to_string()),
            ("type", self.config.account_type.clone()),
        ];
        let data = self.post_for_data(&self.detail_url(), &params).await?;

        // The detail endpoint answers a one-row resultset; anything else
        // means the remote no longer knows the handle.
        data.get("resultset")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(handle.to_string()))
    }
}
