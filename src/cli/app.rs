use anyhow::Context;
use clap::Parser;
use leadertrack::{Archive, FetchConfig, GameMode, HttpFetcher, SyncOptions, sync};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "leadertrack",
    about = "Incremental leaderboard mirror with per-pilot enrichment",
    version
)]
pub struct Args {
    /// Snapshot file holding the mirrored leaderboard data
    pub data_file: PathBuf,

    /// Game modes to sync (comma separated codes)
    #[arg(long, value_delimiter = ',', default_values_t = GameMode::all())]
    pub modes: Vec<GameMode>,

    /// Competitive season to query
    #[arg(long, default_value_t = 9)]
    pub season: u32,

    /// Maximum concurrent detail fetches
    #[arg(long, default_value_t = 50)]
    pub concurrency: usize,

    /// Enrichment queue capacity before submission blocks
    #[arg(long, default_value_t = 1024)]
    pub backlog: usize,

    /// Listing entries requested per page
    #[arg(long, default_value_t = 1000)]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// HTTP(S) proxy URL for all upstream requests
    #[arg(long)]
    pub proxy: Option<String>,

    /// Override the upstream API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

pub struct App {
    args: Args,
}

impl App {
    pub fn new() -> Self {
        Self {
            args: Args::parse(),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut config = FetchConfig::new()
            .season(self.args.season)
            .page_size(self.args.page_size)
            .timeout(Duration::from_secs(self.args.timeout_secs));
        if let Some(base_url) = &self.args.base_url {
            config = config.base_url(base_url);
        }
        if let Some(proxy) = &self.args.proxy {
            config = config.proxy(proxy);
        }

        let fetcher = Arc::new(HttpFetcher::new(config).context("build upstream fetcher")?);
        let options = SyncOptions::new()
            .concurrency(self.args.concurrency)
            .backlog(self.args.backlog);

        let mut archive =
            Archive::load(&self.args.data_file).context("load leaderboard snapshot")?;

        let mut failed_modes = 0usize;
        for &mode in &self.args.modes {
            info!(">>> syncing mode {}", mode.label());
            let board = archive.board_mut(mode);
            match sync(board, mode, Arc::clone(&fetcher), &options).await {
                Ok(report) => {
                    info!(
                        "{}: {} observed, {} enriched, {} errors, {} warnings",
                        mode,
                        report.identities_observed,
                        report.identities_enriched,
                        report.errors.len(),
                        report.warnings.len()
                    );
                    for (handle, err) in &report.errors {
                        warn!("{}: '{}': {}", mode, handle, err);
                    }
                    for (handle, warning) in &report.warnings {
                        warn!("{}: data quality for '{}': {}", mode, handle, warning);
                    }
                }
                Err(err) => {
                    error!("{}: sync failed: {}", mode, err);
                    failed_modes += 1;
                }
            }
        }

        // Persist whatever was mirrored, including partial progress from
        // modes that failed mid-way.
        archive
            .save(&self.args.data_file)
            .context("save leaderboard snapshot")?;

        if failed_modes > 0 {
            anyhow::bail!("{} mode(s) failed to sync", failed_modes);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["leadertrack", "data.mpk"]);
        assert_eq!(args.modes, GameMode::all());
        assert_eq!(args.concurrency, 50);
        assert_eq!(args.page_size, 1000);
        assert!(args.proxy.is_none());
    }

    #[test]
    fn test_mode_list_parsing() {
        let args = Args::parse_from(["leadertrack", "data.mpk", "--modes", "BR,VC"]);
        assert_eq!(
            args.modes,
            vec![GameMode::BattleRoyale, GameMode::VanduulSwarmCoop]
        );
    }
}
