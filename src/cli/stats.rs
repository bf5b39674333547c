//! One-shot stats fetch

use anyhow::Context;
use chrono::Utc;
use clap::Args;

use crate::core::{Fid, StatsFetcher};
use crate::display::{self, StatsView};
use crate::hub::HubClient;
use crate::settings::Settings;

use super::HubArgs;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Subject fid to fetch stats for
    #[arg(long)]
    pub fid: u64,

    #[command(flatten)]
    pub hub: HubArgs,

    /// Print the raw snapshot as JSON instead of the card
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatsArgs) -> anyhow::Result<()> {
    let settings = args.hub.settings()?;
    let fid = Fid::new(args.fid).context("fid must be a positive integer")?;

    let client = HubClient::new(&settings);
    let snapshot = client.fetch_stats(fid).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let view = StatsView::build(
        &snapshot,
        settings.daily_allowance,
        settings.reset_hour_utc,
        Utc::now(),
    );
    print_card(&view, &settings);
    Ok(())
}

fn print_card(view: &StatsView, settings: &Settings) {
    println!("{} ({})", view.display_name, view.username);
    println!("FID: {}", view.fid);
    println!();
    println!("  Sent:            {}", view.sent);
    println!("  Received:        {}", view.received);
    println!("  Failed attempts: {}", view.failed);
    println!("  Daily remaining: {}", view.remaining_daily);
    println!();
    println!("Next reset: {}", view.next_reset_label);
    println!("{}", display::footer_label(settings));
}
