//! In-memory PWM frame standing in for a servo driver board.

use legion_kinematics::{ChannelSink, JointAngles};

/// Channels on one driver board.
pub const FRAME_CHANNELS: usize = 16;

/// Last angle written to each of the sixteen driver channels.
///
/// Channels nothing has written yet read as centred. Writes to channels past
/// the end of the board are counted and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PwmFrame {
    channels: [f32; FRAME_CHANNELS],
    writes: u64,
    dropped: u64,
}

impl Default for PwmFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmFrame {
    /// A frame with every channel centred.
    pub fn new() -> Self {
        Self {
            channels: [JointAngles::CENTERED.hip; FRAME_CHANNELS],
            writes: 0,
            dropped: 0,
        }
    }

    /// Current value of every channel.
    pub fn channels(&self) -> &[f32; FRAME_CHANNELS] {
        &self.channels
    }

    /// Value of one channel.
    pub fn get(&self, channel: u8) -> Option<f32> {
        self.channels.get(usize::from(channel)).copied()
    }

    /// Writes accepted so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Writes addressed to channels the board does not have.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl ChannelSink for PwmFrame {
    #[inline]
    fn write_channel(&mut self, channel: u8, degrees: f32) {
        match self.channels.get_mut(usize::from(channel)) {
            Some(slot) => {
                *slot = degrees;
                self.writes += 1;
            }
            None => self.dropped += 1,
        }
    }
}
