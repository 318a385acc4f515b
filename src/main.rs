use crate::app_config::AppConfig;
use crate::attendance::{Attendance, AttendanceError};
use crate::domain::events::Event;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::trail::LocationTrail;
use crate::tracker::Tracker;
use crate::tracker_listener::tracker_listener;
use chrono::Utc;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::{signal, task};
use tracing::{error, info, warn};

mod app_config;
mod attendance;
mod auth;
mod domain;
mod geofence;
mod geofence_deserializer;
mod position_feed;
mod sse;
mod storage;
mod tracker;
mod tracker_listener;
mod trail;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration, {} geofence(s)", config.geofences().len());

    let store: Arc<dyn KeyValueStore> = match config.storage().path() {
        Some(path) => Arc::new(FileStore::new(path)),
        None => {
            warn!("⚠️ No storage path configured, nothing will survive a restart");
            Arc::new(MemoryStore::default())
        }
    };

    if std::env::args().any(|arg| arg == "--logout") {
        Attendance::new(store.clone()).logout().await?;
        return Ok(());
    }

    let auth_client = auth::new_client(&config)?;
    let session = auth::restore_or_login(&auth_client, &config, store.as_ref()).await?;
    info!("✅  Authenticated");

    let attendance = Attendance::new(store.clone());
    match attendance.clock_in(Utc::now()).await {
        Ok(_) => {}
        Err(AttendanceError::AlreadyClockedIn) => info!("✅  Continuing the current shift"),
        Err(e) => return Err(e.into()),
    }

    let trail = LocationTrail::load(store.clone(), config.tracking().trail_capacity()).await?;
    match trail.entries().last() {
        Some(last) => info!("✅  Loaded trail with {} entries, last fix at {}", trail.len(), last.timestamp),
        None => info!("✅  Loaded an empty trail"),
    }

    let (tx, rx) = mpsc::channel::<Event>(config.core().event_buffer_size());
    let (transitions_tx, transitions_rx) = mpsc::channel(config.core().event_buffer_size());
    let mut tracker = Tracker::new(rx, transitions_tx, config.geofences().to_vec(), trail);
    let snapshot_rx = tracker.notifier();

    task::spawn(async move {
        tracker_listener(transitions_rx).await;
    });
    info!("✅  Initialized transition listener");

    task::spawn(async move {
        tracker.listen().await;
    });
    info!("✅  Initialized tracker");

    let feed_client = position_feed::new_client(&config, &session)?;
    task::spawn(position_feed::poll(
        feed_client.clone(),
        config.feed().url().to_string(),
        config.feed().poll_interval(),
        tx.clone(),
    ));
    info!("✅  Initialized position poller");

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    tokio::select! {
        result = position_feed::watch(&feed_client, &config, tx) => {
            if let Err(e) = result {
                error!("❌ Position watch stopped: {}", e);
            }
        }
        result = signal::ctrl_c() => result?,
    }

    info!("🛑 Shutting down");
    let snapshot = snapshot_rx.borrow().clone();
    let inside = match snapshot.contained.is_empty() {
        true => "none".to_string(),
        false => snapshot.contained.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", "),
    };
    info!(
        "🗺️ Trail holds {} entries from {:?} to {:?}, inside geofence(s): {}",
        snapshot.path.len(),
        snapshot.path.first(),
        snapshot.position,
        inside
    );

    if attendance.status().await?.is_on_shift() {
        if let Err(e) = attendance.clock_out(Utc::now()).await {
            warn!("⚠️ Could not clock out: {}", e);
        }
    }

    Ok(())
}
