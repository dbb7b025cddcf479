//! Polyphonic voltage buses.
//!
//! A cable carries between 1 and [`MAX_POLYPHONY`] channels. An input with
//! zero channels is unpatched. Outputs carry a channel count chosen by the
//! module and a `connected` flag set by the host; modules use the flag to skip
//! work nobody listens to.

use crate::MAX_POLYPHONY;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    voltages: [f32; MAX_POLYPHONY],
    channels: usize,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_connected(&self) -> bool {
        self.channels > 0
    }

    /// Channels beyond the new count keep their last values.
    pub fn set_channels(&mut self, channels: usize) {
        self.channels = channels.min(MAX_POLYPHONY);
    }

    /// Voltage on `channel`, or 0 V for channels the cable does not carry.
    #[inline]
    pub fn voltage(&self, channel: usize) -> f32 {
        if channel < self.channels {
            self.voltages[channel]
        } else {
            0.0
        }
    }

    /// Like [`voltage`](Self::voltage), but a mono cable feeds every channel.
    #[inline]
    pub fn poly_voltage(&self, channel: usize) -> f32 {
        if self.channels == 1 {
            self.voltages[0]
        } else {
            self.voltage(channel)
        }
    }

    /// Write one channel's voltage without changing the channel count.
    pub fn set_voltage(&mut self, channel: usize, volts: f32) {
        if let Some(slot) = self.voltages.get_mut(channel) {
            *slot = volts;
        }
    }

    /// Patch a mono signal.
    pub fn set_mono(&mut self, volts: f32) {
        self.voltages[0] = volts;
        self.channels = 1;
    }

    /// Patch a polyphonic signal; extra values past [`MAX_POLYPHONY`] are dropped.
    pub fn set_poly(&mut self, voltages: &[f32]) {
        let channels = voltages.len().min(MAX_POLYPHONY);
        self.voltages[..channels].copy_from_slice(&voltages[..channels]);
        self.channels = channels;
    }

    pub fn disconnect(&mut self) {
        self.channels = 0;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Output {
    voltages: [f32; MAX_POLYPHONY],
    channels: usize,
    connected: bool,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output with something patched into it.
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn set_channels(&mut self, channels: usize) {
        self.channels = channels.min(MAX_POLYPHONY);
    }

    #[inline]
    pub fn voltage(&self, channel: usize) -> f32 {
        self.voltages.get(channel).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn set_voltage(&mut self, channel: usize, volts: f32) {
        if let Some(slot) = self.voltages.get_mut(channel) {
            *slot = volts;
        }
    }

    /// Voltages of the channels currently in use.
    pub fn voltages(&self) -> &[f32] {
        &self.voltages[..self.channels]
    }
}
