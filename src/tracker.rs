use crate::domain::events::Event;
use crate::domain::{ContainmentState, GeoPoint, Geofence, PositionFix, TransitionEvent};
use crate::geofence::evaluate;
use crate::trail::{LocationTrail, TrailEntry};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch::{self, Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerSnapshot {
    pub position: Option<GeoPoint>,
    pub contained: ContainmentState,
    /// The trail's positions, oldest first.
    pub path: Vec<GeoPoint>,
}

/// Owns the containment state and the trail. Position fixes from every source are handled one at a time.
#[derive(Debug)]
pub struct Tracker {
    fences: Vec<Geofence>,
    state: ContainmentState,
    trail: LocationTrail,
    rx: Receiver<Event>,
    transitions_tx: Sender<TransitionEvent>,
    notifier_tx: WatchSender<TrackerSnapshot>,
    notifier_rx: WatchReceiver<TrackerSnapshot>,
}

impl Tracker {
    pub fn new(rx: Receiver<Event>, transitions_tx: Sender<TransitionEvent>, fences: Vec<Geofence>, trail: LocationTrail) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel(TrackerSnapshot {
            path: trail.path().collect(),
            ..TrackerSnapshot::default()
        });

        Tracker {
            fences,
            state: ContainmentState::new(),
            trail,
            rx,
            transitions_tx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<TrackerSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            match event {
                Event::PositionSampled(fix) => {
                    self.record(&fix).await;

                    let evaluation = evaluate(&fix.position(), &self.fences, &self.state, fix.timestamp);
                    self.state = evaluation.state;
                    for transition in evaluation.events {
                        if self.transitions_tx.send(transition).await.is_err() {
                            warn!("⚠️ Transition listener is gone, dropping transition");
                        }
                    }
                }
                Event::PositionPolled(fix) => self.record(&fix).await,
            }

            self.publish();
        }
        info!("🔵 Event channel closed, tracker stopped");
    }

    async fn record(&mut self, fix: &PositionFix) {
        self.notifier_tx.send_modify(|snapshot| snapshot.position = Some(fix.position()));
        if let Err(e) = self.trail.append(TrailEntry::from(fix)).await {
            warn!("⚠️ Could not persist the trail: {}", e);
        }
    }

    fn publish(&self) {
        self.notifier_tx.send_modify(|snapshot| {
            snapshot.contained = self.state.clone();
            snapshot.path = self.trail.path().collect();
        });
    }
}

#[cfg(test)]
impl Tracker {
    pub fn state(&self) -> &ContainmentState {
        &self.state
    }

    pub fn trail(&self) -> &LocationTrail {
        &self.trail
    }
}
