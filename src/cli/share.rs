//! Print the share-intent URL

use clap::Args;
use url::Url;

use crate::settings::Settings;
use crate::share;

#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Override the widget URL to embed
    #[arg(long)]
    pub frame_url: Option<String>,
}

pub fn run(args: ShareArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load()?;
    if let Some(frame_url) = args.frame_url {
        settings.frame_url = frame_url;
    }
    settings.validate()?;

    let frame_url = Url::parse(&settings.frame_url)?;
    println!("{}", share::compose_share_url(&frame_url));
    Ok(())
}
