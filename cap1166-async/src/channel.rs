//! Touch input and LED output channels.

use crate::reg::{BEHAVIOR_FIELD_MASK, CHANNEL_COUNT};

/// Raw contents of the sensor input status register, one bit per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchStatus(pub u8);

impl TouchStatus {
    /// Whether input `channel` reports a touch.
    pub fn is_touched(self, channel: u8) -> bool {
        channel < CHANNEL_COUNT as u8 && self.0 & (1 << channel) != 0
    }

    /// Whether any input reports a touch.
    pub fn any(self) -> bool {
        self.0 != 0
    }
}

impl From<u8> for TouchStatus {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

/// Receives the touch status once per poll, touched or not.
pub trait TouchListener {
    /// Called with the freshly read status register.
    fn on_touch_status(&mut self, status: TouchStatus);
}

/// A binary sensor bound to one touch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchSensor {
    channel: u8,
    state: Option<bool>,
}

impl TouchSensor {
    /// Creates a sensor for input `channel` (0..=5) with no published state.
    pub const fn new(channel: u8) -> Self {
        Self {
            channel,
            state: None,
        }
    }

    /// The input this sensor is bound to.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Last published state, `None` before the first poll.
    pub fn state(&self) -> Option<bool> {
        self.state
    }

    /// Publishes `touched`, returning `true` when it differs from the
    /// previously published state.
    pub fn publish(&mut self, touched: bool) -> bool {
        let changed = self.state != Some(touched);
        if changed {
            log::debug!("cap1166: input {} -> {}", self.channel, touched);
        }
        self.state = Some(touched);
        changed
    }
}

impl TouchListener for TouchSensor {
    fn on_touch_status(&mut self, status: TouchStatus) {
        self.publish(status.is_touched(self.channel));
    }
}

/// LED illumination pattern, as encoded in the behavior registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedBehavior {
    /// On/off driven directly.
    #[default]
    Direct = 0b00,
    /// Pulse pattern 1.
    Pulse1 = 0b01,
    /// Pulse pattern 2.
    Pulse2 = 0b10,
    /// Breathing pattern.
    Breathe = 0b11,
}

impl LedBehavior {
    /// Every behavior, in the order their duty cycles are programmed.
    pub const ALL: [LedBehavior; 4] = [
        LedBehavior::Direct,
        LedBehavior::Pulse1,
        LedBehavior::Pulse2,
        LedBehavior::Breathe,
    ];

    /// Duty cycle register that holds this behavior's min/max brightness.
    pub fn duty_register(self) -> u8 {
        match self {
            LedBehavior::Direct => crate::reg::LED_DIRECT_DUTY,
            LedBehavior::Pulse1 => crate::reg::LED_PULSE_1_DUTY,
            LedBehavior::Pulse2 => crate::reg::LED_PULSE_2_DUTY,
            LedBehavior::Breathe => crate::reg::LED_BREATHE_DUTY,
        }
    }

    /// Two-bit code written to a channel's behavior field.
    pub fn bits(self) -> u8 {
        self as u8 & BEHAVIOR_FIELD_MASK
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Configuration of one LED output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedChannel {
    channel: u8,
    behavior: LedBehavior,
    linked: bool,
}

impl LedChannel {
    /// Creates a direct-driven LED on output `channel` (0..=5) that follows
    /// the default touch linking.
    pub const fn new(channel: u8) -> Self {
        Self {
            channel,
            behavior: LedBehavior::Direct,
            linked: true,
        }
    }

    /// Sets the behavior programmed during setup.
    pub fn with_behavior(mut self, behavior: LedBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Marks the output as independent: it never mirrors its touch input.
    pub fn independent(mut self) -> Self {
        self.linked = false;
        self
    }

    /// The output this channel drives.
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Behavior programmed during setup.
    pub fn behavior(&self) -> LedBehavior {
        self.behavior
    }

    /// Whether the output may follow the touch link mask.
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_reports_only_its_own_bit() {
        let mut sensor = TouchSensor::new(3);
        assert_eq!(sensor.state(), None);

        sensor.on_touch_status(TouchStatus(0b0000_1000));
        assert_eq!(sensor.state(), Some(true));

        sensor.on_touch_status(TouchStatus(0b0011_0111));
        assert_eq!(sensor.state(), Some(false));
    }

    #[test]
    fn publish_flags_changes() {
        let mut sensor = TouchSensor::new(0);
        assert!(sensor.publish(false));
        assert!(!sensor.publish(false));
        assert!(sensor.publish(true));
    }

    #[test]
    fn status_ignores_bits_above_channel_count() {
        let status = TouchStatus(0b1100_0000);
        assert!(status.any());
        assert!(!status.is_touched(6));
        assert!(!status.is_touched(7));
    }

    #[test]
    fn led_channel_defaults() {
        let led = LedChannel::new(2);
        assert_eq!(led.behavior(), LedBehavior::Direct);
        assert!(led.is_linked());

        let led = led.with_behavior(LedBehavior::Breathe).independent();
        assert_eq!(led.behavior().bits(), 0b11);
        assert!(!led.is_linked());
    }
}
