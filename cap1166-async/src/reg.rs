//! CAP1166 register map and bitfield constants.
//!
//! Values follow the CAP1166 datasheet (Microchip DS00001621). Only the
//! registers this driver touches are listed.

/// Default 7-bit I2C address of the CAP1166.
pub const I2C_ADDRESS: u8 = 0x29;

/// Number of touch inputs and LED outputs on the chip.
pub const CHANNEL_COUNT: usize = 6;

// --- Register Addresses ---
/// Main control: gain, standby, deep sleep and the INT flag.
pub const MAIN_CONTROL: u8 = 0x00;
/// One bit per touch input, set while the input reports a touch.
pub const SENSOR_INPUT_STATUS: u8 = 0x03;
/// Delta sense (bits 6:4) and base shift (bits 3:0).
pub const SENSITIVITY_CONTROL: u8 = 0x1F;
/// Repeat rate enable per input.
pub const REPEAT_RATE_ENABLE: u8 = 0x28;
/// Multiple touch blocking configuration.
pub const MULTIPLE_TOUCH_CONFIG: u8 = 0x2A;
/// Standby channel configuration.
pub const STANDBY_CONFIG: u8 = 0x41;
/// Which LED outputs mirror their touch input.
pub const LED_LINKING: u8 = 0x72;
/// LED output polarity.
pub const LED_POLARITY: u8 = 0x73;
/// Software driven LED state, one bit per output.
pub const LED_OUTPUT_CONTROL: u8 = 0x74;
/// Behavior selection for LED outputs 0..=3, two bits each.
pub const LED_BEHAVIOR_1: u8 = 0x81;
/// Behavior selection for LED outputs 4..=5, two bits each.
pub const LED_BEHAVIOR_2: u8 = 0x82;
/// Min/max duty cycle used by the pulse 1 behavior.
pub const LED_PULSE_1_DUTY: u8 = 0x90;
/// Min/max duty cycle used by the pulse 2 behavior.
pub const LED_PULSE_2_DUTY: u8 = 0x91;
/// Min/max duty cycle used by the breathe behavior.
pub const LED_BREATHE_DUTY: u8 = 0x92;
/// Min/max duty cycle used by the direct behavior.
pub const LED_DIRECT_DUTY: u8 = 0x93;
/// Product ID, fixed per part.
pub const PRODUCT_ID: u8 = 0xFD;
/// Manufacturer ID, fixed for Microchip/SMSC.
pub const MANUFACTURER_ID: u8 = 0xFE;
/// Silicon revision.
pub const REVISION: u8 = 0xFF;

// --- Identity ---
/// Product ID reported by a CAP1166.
pub const EXPECTED_PRODUCT_ID: u8 = 0x51;
/// Manufacturer ID reported by a CAP1166.
pub const EXPECTED_MANUFACTURER_ID: u8 = 0x5D;

// --- Bitmasks and Shifts ---
/// INT bit of `MAIN_CONTROL`; must be cleared to re-arm touch detection.
pub const MAIN_INT_MASK: u8 = 0b0000_0001;
/// Base shift field of `SENSITIVITY_CONTROL`, holds the touch threshold.
pub const SENSITIVITY_THRESHOLD_MASK: u8 = 0b0000_1111;
/// Width mask of one channel's field in the behavior registers.
pub const BEHAVIOR_FIELD_MASK: u8 = 0b11;
/// Bits per channel in the behavior registers.
pub const BEHAVIOR_FIELD_WIDTH: u8 = 2;
/// Channels per behavior register.
pub const BEHAVIOR_CHANNELS_PER_REG: u8 = 4;
/// Duty cycle codes are 4 bits wide.
pub const DUTY_CODE_MASK: u8 = 0x0F;

// --- Fixed values ---
/// Standby configuration written during setup, shortens the sampling cycle.
pub const STANDBY_TUNING: u8 = 0x30;
/// `MULTIPLE_TOUCH_CONFIG` value that allows simultaneous touches.
pub const MULTI_TOUCH_ALLOW: u8 = 0x41;
/// `MULTIPLE_TOUCH_CONFIG` value that blocks simultaneous touches.
pub const MULTI_TOUCH_BLOCK: u8 = 0x80;

/// Returns the behavior register and bit shift holding `channel`'s field.
pub const fn behavior_field(channel: u8) -> (u8, u8) {
    let reg = if channel < BEHAVIOR_CHANNELS_PER_REG {
        LED_BEHAVIOR_1
    } else {
        LED_BEHAVIOR_2
    };
    let shift = (channel % BEHAVIOR_CHANNELS_PER_REG) * BEHAVIOR_FIELD_WIDTH;
    (reg, shift)
}

/// Packs a min/max duty code pair into a duty cycle register value.
pub const fn pack_duty(min: u8, max: u8) -> u8 {
    ((max & DUTY_CODE_MASK) << 4) | (min & DUTY_CODE_MASK)
}
