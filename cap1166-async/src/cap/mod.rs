//! The core implementation of the CAP1166 driver.

pub(crate) mod err;
mod led;
mod setup;

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use heapless::Vec;

use crate::brightness::DutyCycle;
use crate::channel::{LedBehavior, LedChannel, TouchListener, TouchSensor, TouchStatus};
use crate::conf::Config;
use crate::reg::{self, CHANNEL_COUNT};

pub use err::{Error, Identity};
pub use led::Led;
pub use setup::{ResetStep, SetupState};

/// A controller for the CAP1166 capacitive touch and LED driver.
///
/// The controller owns the I2C bus handle, the optional reset pin and a delay
/// provider. Touch sensors and LED channels are registered before
/// [`Cap1166::setup`] runs; afterwards [`Cap1166::poll`] is called once per
/// host loop iteration to refresh the sensors.
pub struct Cap1166<I2cType, RstType, DelayType> {
    i2c: I2cType,
    rst: Option<RstType>,
    delay: DelayType,
    config: Config,
    state: SetupState,
    identity: Identity,
    touch_sensors: Vec<TouchSensor, CHANNEL_COUNT>,
    led_channels: Vec<LedChannel, CHANNEL_COUNT>,
    independent_leds: u8,
    duty_cycles: [DutyCycle; 4],
    warning: bool,
}

impl<I2cType, RstType, DelayType, ErrorType> Cap1166<I2cType, RstType, DelayType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    RstType: OutputPin,
    DelayType: DelayNs,
{
    /// Creates a new `Cap1166`.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C peripheral that implements `embedded-hal-async::i2c::I2c`.
    /// * `rst` - An optional output pin wired to the chip's RESET input.
    /// * `delay` - Delay provider used for the reset sequence.
    /// * `config` - Settings applied by [`Cap1166::setup`].
    pub fn new(i2c: I2cType, rst: Option<RstType>, delay: DelayType, config: Config) -> Self {
        Self {
            i2c,
            rst,
            delay,
            config,
            state: SetupState::Created,
            identity: Identity::default(),
            touch_sensors: Vec::new(),
            led_channels: Vec::new(),
            independent_leds: 0,
            duty_cycles: [DutyCycle::default(); 4],
            warning: false,
        }
    }

    /// Releases the bus, reset pin and delay provider.
    pub fn release(self) -> (I2cType, Option<RstType>, DelayType) {
        (self.i2c, self.rst, self.delay)
    }

    /// Current position in the setup sequence.
    pub fn state(&self) -> SetupState {
        self.state
    }

    /// Whether setup completed and polling is enabled.
    pub fn is_ready(&self) -> bool {
        self.state == SetupState::Ready
    }

    /// Whether setup failed. Polling stays disabled until setup is re-run.
    pub fn is_failed(&self) -> bool {
        self.state == SetupState::Failed
    }

    /// Whether the last poll or LED access hit a bus error.
    pub fn has_warning(&self) -> bool {
        self.warning
    }

    /// Identity bytes read during the last setup.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// The configuration applied during setup.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a touch sensor. Its state is refreshed on every poll.
    pub fn register_touch_sensor(&mut self, sensor: TouchSensor) -> Result<(), Error<ErrorType>> {
        let channel = sensor.channel();
        if !is_valid_channel(channel) || self.touch_sensor(channel).is_some() {
            return Err(Error::InvalidChannel(channel));
        }
        self.touch_sensors
            .push(sensor)
            .map_err(|_| Error::InvalidChannel(channel))?;
        log::debug!("cap1166: registered touch input {channel}");
        Ok(())
    }

    /// Registers an LED output. Its behavior is programmed during setup.
    ///
    /// Independent outputs are removed from the touch link mask.
    pub fn register_led_channel(&mut self, led: LedChannel) -> Result<(), Error<ErrorType>> {
        let channel = led.channel();
        if !is_valid_channel(channel) || self.led_channel(channel).is_some() {
            return Err(Error::InvalidChannel(channel));
        }
        self.led_channels
            .push(led)
            .map_err(|_| Error::InvalidChannel(channel))?;
        if !led.is_linked() {
            self.independent_leds |= 1 << channel;
        }
        log::debug!("cap1166: registered LED output {channel}");
        Ok(())
    }

    /// Registered touch sensors, in registration order.
    pub fn touch_sensors(&self) -> &[TouchSensor] {
        &self.touch_sensors
    }

    /// The sensor registered on input `channel`, if any.
    pub fn touch_sensor(&self, channel: u8) -> Option<&TouchSensor> {
        self.touch_sensors.iter().find(|s| s.channel() == channel)
    }

    /// The LED channel registered on output `channel`, if any.
    pub fn led_channel(&self, channel: u8) -> Option<&LedChannel> {
        self.led_channels.iter().find(|l| l.channel() == channel)
    }

    /// A handle commanding the LED registered on output `channel`.
    pub fn led(&mut self, channel: u8) -> Option<Led<'_, I2cType, RstType, DelayType>> {
        let led = *self.led_channel(channel)?;
        Some(Led::new(self, led))
    }

    /// Value written to the LED linking register: the default link mask
    /// without the independent outputs.
    pub fn led_link_mask(&self) -> u8 {
        self.config.link_mask() & !self.independent_leds
    }

    /// Reads the touch status and refreshes every registered sensor.
    ///
    /// Returns `None` without touching the bus unless setup completed. When
    /// an input reports a touch, the INT flag is cleared so the chip reports
    /// fresh state on the next poll. A failed acknowledge is returned after
    /// the status was dispatched.
    pub async fn poll(&mut self) -> Result<Option<TouchStatus>, Error<ErrorType>> {
        self.poll_with(|_| {}).await
    }

    /// Like [`Cap1166::poll`], also handing the status to `listener`.
    pub async fn poll_into<L>(&mut self, listener: &mut L) -> Result<Option<TouchStatus>, Error<ErrorType>>
    where
        L: TouchListener + ?Sized,
    {
        self.poll_with(|status| listener.on_touch_status(status)).await
    }

    async fn poll_with<F>(&mut self, dispatch: F) -> Result<Option<TouchStatus>, Error<ErrorType>>
    where
        F: FnOnce(TouchStatus),
    {
        if !self.is_ready() {
            return Ok(None);
        }
        let result = self.read_register(reg::SENSOR_INPUT_STATUS).await;
        let status = TouchStatus(self.track(result)?);

        let ack = if status.any() {
            self.modify_register(reg::MAIN_CONTROL, |v| v & !reg::MAIN_INT_MASK)
                .await
        } else {
            Ok(())
        };

        for sensor in self.touch_sensors.iter_mut() {
            sensor.on_touch_status(status);
        }
        dispatch(status);

        self.track(ack)?;
        Ok(Some(status))
    }

    /// Switches LED output `channel` on or off.
    pub async fn set_led(&mut self, channel: u8, on: bool) -> Result<(), Error<ErrorType>> {
        if !is_valid_channel(channel) {
            return Err(Error::InvalidChannel(channel));
        }
        let result = self
            .modify_register(reg::LED_OUTPUT_CONTROL, |v| {
                let data = if on { v | (1 << channel) } else { v & !(1 << channel) };
                log::debug!("cap1166: LED {channel} -> {on}, output control 0x{v:02x} -> 0x{data:02x}");
                data
            })
            .await;
        self.track(result)
    }

    /// Switches LED output `channel` on.
    pub async fn led_on(&mut self, channel: u8) -> Result<(), Error<ErrorType>> {
        self.set_led(channel, true).await
    }

    /// Switches LED output `channel` off.
    pub async fn led_off(&mut self, channel: u8) -> Result<(), Error<ErrorType>> {
        self.set_led(channel, false).await
    }

    /// Programs the behavior of LED output `channel`, leaving the other
    /// outputs' behavior bits untouched.
    pub async fn configure_led_behavior(
        &mut self,
        channel: u8,
        behavior: LedBehavior,
    ) -> Result<(), Error<ErrorType>> {
        if !is_valid_channel(channel) {
            return Err(Error::InvalidChannel(channel));
        }
        let result = self.write_led_behavior(channel, behavior).await;
        self.track(result)
    }

    pub(crate) async fn write_led_behavior(
        &mut self,
        channel: u8,
        behavior: LedBehavior,
    ) -> Result<(), Error<ErrorType>> {
        let (behavior_reg, shift) = reg::behavior_field(channel);
        self.modify_register(behavior_reg, |v| {
            let data = (v & !(reg::BEHAVIOR_FIELD_MASK << shift)) | (behavior.bits() << shift);
            log::debug!(
                "cap1166: LED {channel} behavior {behavior:?} (reg 0x{behavior_reg:02x} = 0x{data:02x})"
            );
            data
        })
        .await
    }

    /// Stores the brightness range of `behavior` from percentages.
    ///
    /// The range is written during the next configuration pass, that is
    /// [`Cap1166::setup`] or [`Cap1166::reconfigure`].
    pub fn set_behavior_brightness(
        &mut self,
        behavior: LedBehavior,
        max_percent: u8,
        min_percent: u8,
    ) -> DutyCycle {
        let duty = DutyCycle::from_percentages(max_percent, min_percent);
        self.duty_cycles[behavior.index()] = duty;
        log::debug!(
            "cap1166: {behavior:?} brightness {max_percent}% -> max 0x{:x}, {min_percent}% -> min 0x{:x}",
            duty.max,
            duty.min
        );
        duty
    }

    /// The stored brightness range of `behavior`.
    pub fn behavior_brightness(&self, behavior: LedBehavior) -> DutyCycle {
        self.duty_cycles[behavior.index()]
    }

    /// Logs the driver configuration and setup outcome.
    pub fn dump_config(&self) {
        log::info!("CAP1166:");
        log::info!("  Address: 0x{:02x}", self.config.address);
        log::info!("  Reset Pin: {}", if self.rst.is_some() { "yes" } else { "none" });
        log::info!(
            "  Product ID: 0x{:x}\n  Manufacture ID: 0x{:x}\n  Revision ID: 0x{:x}",
            self.identity.product_id,
            self.identity.manufacturer_id,
            self.identity.revision
        );
        log::info!(
            "  Touch threshold: {}, multi touch: {:?}, LED link mask: 0x{:02x}",
            self.config.touch_threshold,
            self.config.multi_touch,
            self.led_link_mask()
        );
        if self.is_failed() {
            log::error!(
                "Product ID or Manufacture ID of the connected device does not match a known CAP1166."
            );
        }
    }

    fn track<T>(&mut self, result: Result<T, Error<ErrorType>>) -> Result<T, Error<ErrorType>> {
        match &result {
            Ok(_) => self.warning = false,
            Err(err) => {
                log::warn!("cap1166: {err:?}");
                self.warning = true;
            }
        }
        result
    }

    pub(crate) async fn read_register(&mut self, register: u8) -> Result<u8, Error<ErrorType>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.config.address, &[register], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    pub(crate) async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<ErrorType>> {
        self.i2c
            .write(self.config.address, &[register, value])
            .await
            .map_err(Error::I2c)
    }

    pub(crate) async fn modify_register<F>(&mut self, register: u8, f: F) -> Result<(), Error<ErrorType>>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_register(register).await?;
        self.write_register(register, f(value)).await
    }
}

fn is_valid_channel(channel: u8) -> bool {
    (channel as usize) < CHANNEL_COUNT
}
