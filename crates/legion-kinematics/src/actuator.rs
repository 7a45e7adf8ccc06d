//! Actuator output seam.
//!
//! The motion core never talks to hardware directly. Every tick it writes
//! twelve angles through an [`ActuatorSink`]; drivers that address joints by
//! a flat channel number implement [`ChannelSink`] and are wrapped in a
//! [`ChannelActuator`].

use legion_geometry::{ChannelMap, JointId, LegId};

use crate::angles::JointAngles;

/// Receives joint angles addressed by leg and joint.
///
/// Implementations must not block; the call happens inside the control tick.
pub trait ActuatorSink {
    /// Command one joint to `degrees` in the actuator frame, inside `[0, 180]`.
    fn set_joint_angle(&mut self, leg: LegId, joint: JointId, degrees: f32);
}

impl<A: ActuatorSink + ?Sized> ActuatorSink for &mut A {
    #[inline]
    fn set_joint_angle(&mut self, leg: LegId, joint: JointId, degrees: f32) {
        (**self).set_joint_angle(leg, joint, degrees);
    }
}

impl<A: ActuatorSink + ?Sized> ActuatorSink for Box<A> {
    #[inline]
    fn set_joint_angle(&mut self, leg: LegId, joint: JointId, degrees: f32) {
        (**self).set_joint_angle(leg, joint, degrees);
    }
}

/// Receives angles addressed by a flat driver channel.
pub trait ChannelSink {
    /// Command `channel` to `degrees`.
    fn write_channel(&mut self, channel: u8, degrees: f32);
}

/// Adapts a [`ChannelSink`] to [`ActuatorSink`] through a [`ChannelMap`].
#[derive(Debug, Clone)]
pub struct ChannelActuator<C> {
    channels: ChannelMap,
    sink: C,
}

impl<C: ChannelSink> ChannelActuator<C> {
    /// Wrap `sink` with the given wiring.
    pub fn new(channels: ChannelMap, sink: C) -> Self {
        Self { channels, sink }
    }

    /// Wiring used to resolve channels.
    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    /// Borrow the wrapped driver.
    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Unwrap the driver.
    pub fn into_inner(self) -> C {
        self.sink
    }
}

impl<C: ChannelSink> ActuatorSink for ChannelActuator<C> {
    #[inline]
    fn set_joint_angle(&mut self, leg: LegId, joint: JointId, degrees: f32) {
        let channel = self.channels.channel(leg, joint);
        self.sink.write_channel(channel, degrees);
    }
}

/// Write all three joints of one leg in hip, thigh, knee order.
#[inline]
pub fn write_leg<A: ActuatorSink + ?Sized>(sink: &mut A, leg: LegId, angles: &JointAngles) {
    for joint in JointId::ALL {
        sink.set_joint_angle(leg, joint, angles.get(joint));
    }
}
