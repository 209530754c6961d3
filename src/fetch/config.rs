use std::time::Duration;

/// Upstream API configuration.
///
/// Everything the fetcher needs (endpoints, season, proxy) is injected
/// here rather than read from process-wide state.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the leaderboard API.
    pub base_url: String,

    /// Competitive season to query.
    pub season: u32,

    /// Entries requested per listing page.
    pub page_size: u32,

    /// Map filter passed through to the API.
    pub map_filter: String,

    /// Leaderboard account type.
    pub account_type: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Optional HTTP(S) proxy URL.
    pub proxy: Option<String>,

    /// User agent presented to the remote service.
    pub user_agent: String,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            base_url: "https://robertsspaceindustries.com/api/arena-commander".to_string(),
            season: 9,
            page_size: 1000,
            map_filter: "MAP-ANY".to_string(),
            account_type: "Account".to_string(),
            timeout: Duration::from_secs(20),
            proxy: None,
            user_agent: concat!("leadertrack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the season
    pub fn season(mut self, season: u32) -> Self {
        self.season = season;
        self
    }

    /// Set the listing page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route requests through a proxy
    pub fn proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }

        if self.page_size == 0 {
            return Err("page_size must be > 0".to_string());
        }

        if let Some(proxy) = &self.proxy
            && proxy.trim().is_empty()
        {
            return Err("proxy URL cannot be blank".to_string());
        }

        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}
