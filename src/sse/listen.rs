use crate::sse::server_sent_event::{ServerSentEvent, drain_blocks};
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug)]
pub struct Config {
    pub url: String,
    pub retry_ms: u64,
    pub retry_max_delay: Duration,
    pub stale_connection_timeout: Duration,
}

/// Streams events from `config.url` into `tx`, reconnecting with exponential backoff whenever the stream fails,
/// ends or goes silent. Returns once the receiving side of `tx` is gone.
#[instrument(skip_all, fields(url = %config.url))]
pub async fn listen<T>(tx: Sender<ServerSentEvent<T>>, client: &Client, config: &Config) -> Result<(), Box<dyn Error>>
where
    T: DeserializeOwned + Debug + Send + 'static,
{
    let strategy = ExponentialBackoff::from_millis(config.retry_ms)
        .factor(2)
        .max_delay(config.retry_max_delay)
        .map(jitter);

    info!("Connecting to SSE stream {}...", config.url);
    Retry::spawn(strategy, || async {
        if tx.is_closed() {
            return Ok(());
        }

        match connect_sse_stream::<T>(tx.clone(), client, config).await {
            Ok(_) => {
                info!("✅ SSE stream ended gracefully. Restarting...");
                Err("Stream ended") // Triggers retry
            }
            Err(e) => {
                warn!("⚠️ SSE error: {}. Retrying...", e);
                Err("SSE failed") // Triggers retry
            }
        }
    })
    .await?;

    Ok(())
}

async fn connect_sse_stream<T>(tx: Sender<ServerSentEvent<T>>, client: &Client, config: &Config) -> Result<(), Box<dyn Error>>
where
    T: DeserializeOwned + Debug + Send + 'static,
{
    let response = client.get(&config.url).header("Accept", "text/event-stream").send().await?.error_for_status()?;

    if response.status() == StatusCode::OK {
        info!(status = %response.status(), "Connecting to SSE stream {}... OK", config.url);
    }

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();
    loop {
        let event = timeout(config.stale_connection_timeout, stream.next()).await;
        match event {
            Ok(Some(Ok(chunk))) => {
                buffer.extend_from_slice(&chunk);
                for block in drain_blocks(&mut buffer) {
                    match ServerSentEvent::<T>::from_str(&block) {
                        Ok(event) => {
                            debug!(event = block.trim(), "🔸 Received event: {:?}", event);
                            tx.send(event).await?;
                        }
                        Err(e) => warn!(event = block.trim(), "⚠️ Skipping malformed event: {}", e),
                    }
                }
            }
            Ok(Some(Err(e))) => {
                error!("❌ SSE stream error: {}", e);
                return Err(Box::new(e));
            }
            Ok(None) => {
                warn!("🔴 SSE stream ended");
                return Err("Stream closed".into());
            }
            Err(_) => {
                warn!("⏳ No data for {} seconds. Reconnecting...", config.stale_connection_timeout.as_secs());
                return Err("Timeout".into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use test_log::test;
    use tokio::sync::mpsc;

    #[derive(Deserialize, PartialEq, Debug)]
    struct Data {
        n: u32,
    }

    fn config(url: String) -> Config {
        Config {
            url,
            retry_ms: 10,
            retry_max_delay: Duration::from_millis(20),
            stale_connection_timeout: Duration::from_secs(5),
        }
    }

    #[test(tokio::test)]
    async fn forwards_events_until_the_stream_closes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/positions")
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body("data: {\"n\": 1}\n\n: keep-alive\n\ndata: not json\n\ndata: {\"n\": 2}\n\n")
            .create_async()
            .await;

        let (tx, mut rx) = mpsc::channel::<ServerSentEvent<Data>>(8);
        let result = connect_sse_stream(tx, &Client::new(), &config(format!("{}/positions", server.url()))).await;

        mock.assert();
        assert_eq!(result.unwrap_err().to_string(), "Stream closed");

        let mut received = Vec::new();
        while let Some(event) = rx.recv().await {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
        assert_eq!(received[0].data, Some(Data { n: 1 }));
        assert_eq!(received[1].comment, Some("keep-alive".to_string()));
        assert_eq!(received[2].data, Some(Data { n: 2 }));
    }

    #[test(tokio::test)]
    async fn a_failing_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/positions").with_status(503).create_async().await;

        let (tx, _rx) = mpsc::channel::<ServerSentEvent<Data>>(8);
        let result = connect_sse_stream(tx, &Client::new(), &config(format!("{}/positions", server.url()))).await;

        assert!(result.is_err());
    }

    #[test(tokio::test)]
    async fn listen_stops_once_the_receiver_is_gone() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/positions").with_status(200).with_body("data: {\"n\": 1}\n\n").create_async().await;

        let (tx, rx) = mpsc::channel::<ServerSentEvent<Data>>(8);
        drop(rx);

        let result = listen(tx, &Client::new(), &config(format!("{}/positions", server.url()))).await;

        assert!(result.is_ok());
    }
}
