//! Continuous polling loop

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use clap::Args;
use url::Url;

use crate::core::Fid;
use crate::display::StatsView;
use crate::frame::FrameSession;
use crate::host::{EventBus, FrameContext, HostActions, HostError};
use crate::hub::HubClient;
use crate::poller::StatsPoller;

use super::HubArgs;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Subject fid to watch
    #[arg(long)]
    pub fid: u64,

    #[command(flatten)]
    pub hub: HubArgs,

    /// Override the refresh interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

/// Terminal stand-in for the host frame: actions become log lines and
/// opened URLs are printed.
struct TermHost;

#[async_trait]
impl HostActions for TermHost {
    async fn signal_ready(&self) -> Result<(), HostError> {
        tracing::debug!("declared ready");
        Ok(())
    }

    async fn request_add(&self) -> Result<(), HostError> {
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<(), HostError> {
        println!("{url}");
        Ok(())
    }
}

pub async fn run(args: WatchArgs) -> anyhow::Result<()> {
    let mut settings = args.hub.settings()?;
    if let Some(interval_ms) = args.interval_ms {
        settings.poll_interval_ms = interval_ms;
        settings.validate()?;
    }
    let fid = Fid::new(args.fid).context("fid must be a positive integer")?;
    let frame_url = Url::parse(&settings.frame_url)?;

    let poller = Arc::new(StatsPoller::new(
        Arc::new(HubClient::new(&settings)),
        Duration::from_millis(settings.poll_interval_ms),
    ));
    let mut rx = poller.watch();

    let bus = EventBus::new();
    let context = FrameContext {
        subject: Some(fid),
        client_added: true,
        ..Default::default()
    };
    let session = FrameSession::start(
        context,
        Arc::new(TermHost),
        &bus,
        Arc::clone(&poller),
        frame_url,
    )
    .await?;

    tracing::info!(%fid, interval_ms = settings.poll_interval_ms, "watching nut stats, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = rx.borrow_and_update().clone();
                if let Some(error) = &view.last_error {
                    tracing::warn!(%error, "refresh failed, keeping last good stats");
                } else if let Some(stats) = &view.stats {
                    let v = StatsView::build(
                        stats,
                        settings.daily_allowance,
                        settings.reset_hour_utc,
                        Utc::now(),
                    );
                    println!(
                        "[{}] sent {} | received {} | failed {} | {} left until {}",
                        stats.captured_at.format("%H:%M:%S"),
                        v.sent,
                        v.received,
                        v.failed,
                        v.remaining_daily,
                        v.next_reset_label
                    );
                }
            }
        }
    }

    drop(session);
    Ok(())
}
