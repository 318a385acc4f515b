use crate::domain::PositionFix;

#[derive(Debug)]
pub enum Event {
    /// A fix from the continuous watch, drives geofence detection.
    PositionSampled(PositionFix),
    /// A fix from the periodic poll, only extends the trail.
    PositionPolled(PositionFix),
}
