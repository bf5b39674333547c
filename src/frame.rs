//! Frame session driver
//!
//! Thin glue between the host surface and the polling engine: hands the
//! host's subject to the poller, declares readiness, asks to be added when
//! the client has not added the widget yet, and maps host events onto
//! engine operations (primary button acts as a manual refresh). Everything
//! host-side is reached only through the `host` traits.

use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::host::{EventBus, FrameContext, HostActions, HostError, HostEvent};
use crate::poller::StatsPoller;
use crate::share;

pub struct FrameSession {
    actions: Arc<dyn HostActions>,
    poller: Arc<StatsPoller>,
    frame_url: Url,
    events_task: Option<JoinHandle<()>>,
}

impl FrameSession {
    /// Wire up a session: subject into the poller, ready/add handshake,
    /// event subscription. Fails only if the host refuses the ready signal.
    pub async fn start(
        context: FrameContext,
        actions: Arc<dyn HostActions>,
        bus: &EventBus,
        poller: Arc<StatsPoller>,
        frame_url: Url,
    ) -> Result<Self, HostError> {
        tracing::debug!(subject = ?context.subject, safe_area = ?context.safe_area, "frame context received");

        // Start fetching before declaring ready so the first paint already
        // has a request underway
        poller.set_subject(context.subject);

        actions.signal_ready().await?;

        if !context.client_added {
            if let Err(e) = actions.request_add().await {
                tracing::info!(error = %e, "add to favorites declined");
            }
        }

        let mut subscription = bus.subscribe();
        let events_task = tokio::spawn({
            let poller = Arc::clone(&poller);
            async move {
                while let Some(event) = subscription.next().await {
                    match event {
                        HostEvent::PrimaryButtonPressed => poller.refresh(),
                        HostEvent::Added => tracing::info!("widget added"),
                        HostEvent::AddRejected { reason } => {
                            tracing::info!(%reason, "widget add rejected");
                        }
                        HostEvent::Removed => tracing::info!("widget removed"),
                        other => tracing::debug!(?other, "host event"),
                    }
                }
            }
        });

        Ok(Self {
            actions,
            poller,
            frame_url,
            events_task: Some(events_task),
        })
    }

    /// Open the share composer prefilled with this widget's URL.
    pub async fn share(&self) -> Result<(), HostError> {
        let url = share::compose_share_url(&self.frame_url);
        self.actions.open_url(&url).await
    }

    pub fn poller(&self) -> &StatsPoller {
        &self.poller
    }
}

impl Drop for FrameSession {
    fn drop(&mut self) {
        // Tearing down the event task drops its subscription handle, which
        // unregisters that listener; the poller goes idle with it.
        if let Some(task) = self.events_task.take() {
            task.abort();
        }
        self.poller.set_subject(None);
    }
}
