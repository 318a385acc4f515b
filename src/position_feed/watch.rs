use crate::app_config::AppConfig;
use crate::domain::PositionFix;
use crate::domain::events::Event;
use crate::sse::{self, ServerSentEvent};
use reqwest::Client;
use std::error::Error;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task;
use tracing::{debug, info, instrument};

/// Continuously watches the position feed and forwards every fix as [`Event::PositionSampled`].
#[instrument(skip_all)]
pub async fn watch(client: &Client, config: &AppConfig, tx: Sender<Event>) -> Result<(), Box<dyn Error>> {
    let (sse_tx, sse_rx) = mpsc::channel::<ServerSentEvent<PositionFix>>(config.core().event_buffer_size());
    task::spawn(forward(sse_rx, tx));

    let sse_config = sse::Config {
        url: format!("{}/positions", config.feed().url()),
        retry_ms: config.feed().retry_ms(),
        retry_max_delay: config.feed().retry_max_delay(),
        stale_connection_timeout: config.feed().stale_connection_timeout(),
    };
    sse::listen(sse_tx, client, &sse_config).await
}

async fn forward(mut rx: Receiver<ServerSentEvent<PositionFix>>, tx: Sender<Event>) {
    while let Some(event) = rx.recv().await {
        let Some(fix) = event.data else {
            continue; // Keep-alives and comments
        };

        debug!("📡 Sampled position {}, {}", fix.latitude, fix.longitude);
        if tx.send(Event::PositionSampled(fix)).await.is_err() {
            info!("📡 Tracker is gone, stopping position watch");
            return;
        }
    }
}
