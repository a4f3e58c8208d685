//! Configuration applied to the CAP1166 during setup.

use embassy_time::Duration;

use crate::reg;

/// How the chip treats several inputs touched at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiTouch {
    /// Report every touched input.
    Allow,
    /// Block simultaneous touches.
    #[default]
    Block,
}

impl MultiTouch {
    /// Value written to the multiple touch configuration register.
    pub fn register_value(self) -> u8 {
        match self {
            MultiTouch::Allow => reg::MULTI_TOUCH_ALLOW,
            MultiTouch::Block => reg::MULTI_TOUCH_BLOCK,
        }
    }
}

/// Configuration parameters used to set up the CAP1166.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 7-bit I2C address of the device.
    pub address: u8,
    /// Touch threshold written to the base shift field, 0..=15.
    pub touch_threshold: u8,
    /// Simultaneous touch handling.
    pub multi_touch: MultiTouch,
    /// Whether LED outputs follow their touch input by default.
    /// LED channels registered as independent are always excluded.
    pub link_leds: bool,
    /// Time to wait after each edge of the reset sequence.
    pub reset_settle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: reg::I2C_ADDRESS,
            touch_threshold: 0x0F,
            multi_touch: MultiTouch::Block,
            link_leds: true,
            reset_settle: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Sets the I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Sets the touch threshold. Values above 15 are truncated to 4 bits.
    pub fn with_touch_threshold(mut self, threshold: u8) -> Self {
        self.touch_threshold = threshold & reg::SENSITIVITY_THRESHOLD_MASK;
        self
    }

    /// Allows or blocks simultaneous touches.
    pub fn with_multiple_touches(mut self, allow: bool) -> Self {
        self.multi_touch = if allow {
            MultiTouch::Allow
        } else {
            MultiTouch::Block
        };
        self
    }

    /// Links LED outputs to their touch inputs by default.
    pub fn with_link_leds(mut self, link: bool) -> Self {
        self.link_leds = link;
        self
    }

    /// Sets the settle time used between reset pin edges.
    pub fn with_reset_settle(mut self, settle: Duration) -> Self {
        self.reset_settle = settle;
        self
    }

    /// Default LED linking mask before independent channels are removed.
    pub(crate) fn link_mask(&self) -> u8 {
        if self.link_leds {
            0xFF
        } else {
            0x00
        }
    }
}
