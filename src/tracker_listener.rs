use crate::domain::TransitionEvent;
use crate::domain::TransitionKind::{Enter, Exit};
use tokio::sync::mpsc::Receiver;
use tracing::{info, instrument};

/// Logs every transition and returns how many were received once the tracker is gone.
#[instrument(skip_all)]
pub async fn tracker_listener(mut rx: Receiver<TransitionEvent>) -> usize {
    let mut received = 0;
    while let Some(transition) = rx.recv().await {
        received += 1;
        match transition.kind {
            Enter => info!(geofence_id = transition.geofence_id, "📍 Checked in at '{}' at {}", transition.geofence_name, transition.timestamp),
            Exit => info!(geofence_id = transition.geofence_id, "🚶 Moved away from '{}' at {}", transition.geofence_name, transition.timestamp),
        }
    }
    received
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEFAULT_RADIUS_M, GeoPoint, Geofence};
    use chrono::Utc;
    use test_log::test;
    use tokio::sync::mpsc;

    #[test(tokio::test)]
    async fn counts_received_transitions() {
        let fence = Geofence {
            id: 1,
            name: "Dealer 1".to_string(),
            center: GeoPoint::new(28.50573, 77.41006),
            radius_meters: DEFAULT_RADIUS_M,
        };
        let (tx, rx) = mpsc::channel(4);
        tx.send(TransitionEvent::new(&fence, Enter, Utc::now())).await.unwrap();
        tx.send(TransitionEvent::new(&fence, Exit, Utc::now())).await.unwrap();
        drop(tx);

        assert_eq!(tracker_listener(rx).await, 2);
    }
}
