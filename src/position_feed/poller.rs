use crate::domain::PositionFix;
use crate::domain::events::Event;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::{Instant, interval_at};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, instrument, warn};

#[instrument(skip(client))]
pub async fn fetch_current_fix(client: &Client, feed_url: &str) -> Result<PositionFix, reqwest::Error> {
    client
        .get(format!("{}/position", feed_url))
        .send()
        .await?
        .error_for_status()?
        .json::<PositionFix>()
        .await
}

/// Fetches the current fix every `period`, starting one period from now, and forwards it as
/// [`Event::PositionPolled`]. Failed fetches are skipped. Returns once the receiving side of `tx` is gone.
#[instrument(skip(client, tx))]
pub async fn poll(client: Client, feed_url: String, period: Duration, tx: Sender<Event>) {
    let mut ticks = IntervalStream::new(interval_at(Instant::now() + period, period));

    while ticks.next().await.is_some() {
        match fetch_current_fix(&client, &feed_url).await {
            Ok(fix) => {
                debug!("📡 Polled position {}, {}", fix.latitude, fix.longitude);
                if tx.send(Event::PositionPolled(fix)).await.is_err() {
                    debug!("📡 Tracker is gone, stopping poller");
                    return;
                }
            }
            Err(e) => warn!("⚠️ Could not poll the current position: {}", e),
        }
    }
}
