//! Recording implementations of the output seams.
//!
//! Each recorder is a cheap clone over shared storage so a test can keep one
//! handle while the controller owns the other.

use std::sync::Arc;

use legion_geometry::{JointId, LegId, LegMap};
use legion_kinematics::{ActuatorSink, ChannelSink, JointAngles};
use legion_tracing::{MotionTraceEvent, TraceSink};
use parking_lot::Mutex;

/// One `set_joint_angle` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorWrite {
    pub leg: LegId,
    pub joint: JointId,
    pub degrees: f32,
}

/// Actuator that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    writes: Arc<Mutex<Vec<ActuatorWrite>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<ActuatorWrite> {
        self.writes.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.writes.lock().clear();
    }

    /// Most recent angle written to one joint.
    pub fn last_angle(&self, leg: LegId, joint: JointId) -> Option<f32> {
        self.writes
            .lock()
            .iter()
            .rev()
            .find(|w| w.leg == leg && w.joint == joint)
            .map(|w| w.degrees)
    }

    /// Most recent angles of every leg, if every joint has been written.
    pub fn last_frame(&self) -> Option<LegMap<JointAngles>> {
        let mut frame = LegMap::splat(JointAngles::default());
        for leg in LegId::ALL {
            frame[leg] = JointAngles::new(
                self.last_angle(leg, JointId::Hip)?,
                self.last_angle(leg, JointId::Thigh)?,
                self.last_angle(leg, JointId::Knee)?,
            );
        }
        Some(frame)
    }
}

impl ActuatorSink for RecordingActuator {
    fn set_joint_angle(&mut self, leg: LegId, joint: JointId, degrees: f32) {
        self.writes.lock().push(ActuatorWrite {
            leg,
            joint,
            degrees,
        });
    }
}

/// Channel driver that records `(channel, degrees)` pairs.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannels {
    writes: Arc<Mutex<Vec<(u8, f32)>>>,
}

impl RecordingChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<(u8, f32)> {
        self.writes.lock().clone()
    }
}

impl ChannelSink for RecordingChannels {
    fn write_channel(&mut self, channel: u8, degrees: f32) {
        self.writes.lock().push((channel, degrees));
    }
}

/// Trace sink that keeps every event.
#[derive(Debug, Clone, Default)]
pub struct RecordingTraceSink {
    events: Arc<Mutex<Vec<MotionTraceEvent>>>,
}

impl RecordingTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MotionTraceEvent> {
        self.events.lock().clone()
    }

    /// Events whose [`MotionTraceEvent::event_type`] equals `event_type`.
    pub fn of_type(&self, event_type: &str) -> Vec<MotionTraceEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .copied()
            .collect()
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    pub fn fault_events(&self) -> Vec<MotionTraceEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_fault())
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl TraceSink for RecordingTraceSink {
    fn emit(&mut self, event: MotionTraceEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_kinematics::write_leg;

    #[test]
    fn test_recording_actuator_shares_storage() {
        let handle = RecordingActuator::new();
        let mut owned = handle.clone();
        for leg in LegId::ALL {
            write_leg(&mut owned, leg, &JointAngles::new(90.0, 45.0, 120.0));
        }
        assert_eq!(handle.len(), 12);
        let frame = crate::must::must_some(handle.last_frame(), "frame");
        assert!((frame[LegId::RearLeft].knee - 120.0).abs() < f32::EPSILON);
        handle.clear();
        assert!(owned.is_empty());
        assert!(handle.last_frame().is_none());
    }

    #[test]
    fn test_recording_trace_sink_filters() {
        let handle = RecordingTraceSink::new();
        let mut owned = handle.clone();
        owned.emit(MotionTraceEvent::TickStart {
            tick: 1,
            timestamp_ns: 0,
        });
        owned.emit(MotionTraceEvent::SiteHeld {
            tick: 1,
            leg: LegId::FrontRight,
        });
        assert_eq!(handle.events().len(), 2);
        assert_eq!(handle.count("site_held"), 1);
        assert_eq!(handle.fault_events().len(), 1);
        assert_eq!(handle.of_type("tick_start").len(), 1);
    }
}
