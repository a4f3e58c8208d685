//! Reset, identity check and register initialization.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use super::{Cap1166, Error, Identity};
use crate::channel::LedBehavior;
use crate::reg;

/// One edge of the reset pulse. Every edge is followed by the settle delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Pull RESET low.
    DriveLow,
    /// Release RESET high.
    DriveHigh,
    /// Pull RESET low again so the chip runs.
    DriveLowAgain,
}

impl ResetStep {
    /// Pin level driven by this step.
    pub fn level(self) -> PinState {
        match self {
            ResetStep::DriveLow | ResetStep::DriveLowAgain => PinState::Low,
            ResetStep::DriveHigh => PinState::High,
        }
    }

    /// Step that follows once this step's delay elapsed.
    pub fn next(self) -> Option<ResetStep> {
        match self {
            ResetStep::DriveLow => Some(ResetStep::DriveHigh),
            ResetStep::DriveHigh => Some(ResetStep::DriveLowAgain),
            ResetStep::DriveLowAgain => None,
        }
    }
}

/// Setup progress of a [`Cap1166`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// Constructed, setup not started.
    Created,
    /// Running the reset pulse; holds the current edge.
    Resetting(ResetStep),
    /// Reading the identity registers.
    Validating,
    /// Writing the configuration registers.
    Configuring,
    /// Setup finished, polling enabled.
    Ready,
    /// Setup failed, polling disabled.
    Failed,
}

impl<I2cType, RstType, DelayType, ErrorType> Cap1166<I2cType, RstType, DelayType>
where
    I2cType: I2c<SevenBitAddress, Error = ErrorType>,
    ErrorType: embedded_hal_async::i2c::Error,
    RstType: OutputPin,
    DelayType: DelayNs,
{
    /// Runs the full setup sequence.
    ///
    /// Pulses the reset pin when one is configured, checks the chip identity
    /// and writes the configuration. On success polling is enabled. On any
    /// failure the controller ends in [`SetupState::Failed`] and stays there
    /// until `setup` is called again.
    pub async fn setup(&mut self) -> Result<(), Error<ErrorType>> {
        self.state = SetupState::Created;
        self.warning = false;

        let result = self.run_setup().await;
        if let Err(err) = &result {
            log::warn!("cap1166: setup failed: {err:?}");
            self.state = SetupState::Failed;
        }
        result
    }

    /// Re-runs the configuration pass on a ready device, applying brightness,
    /// threshold and LED behavior changes made since setup.
    ///
    /// The identity was already checked, so a bus error here keeps the
    /// device ready and only raises the warning flag.
    pub async fn reconfigure(&mut self) -> Result<(), Error<ErrorType>> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        let result = self.configure().await;
        if result.is_err() {
            self.state = SetupState::Ready;
        }
        self.track(result)
    }

    async fn run_setup(&mut self) -> Result<(), Error<ErrorType>> {
        self.reset().await?;
        self.validate().await?;
        self.configure().await
    }

    async fn reset(&mut self) -> Result<(), Error<ErrorType>> {
        let Some(rst) = self.rst.as_mut() else {
            log::trace!("cap1166: no reset pin, skipping reset");
            return Ok(());
        };
        let settle_ms = u32::try_from(self.config.reset_settle.as_millis()).unwrap_or(u32::MAX);

        let mut step = Some(ResetStep::DriveLow);
        while let Some(current) = step {
            self.state = SetupState::Resetting(current);
            log::trace!("cap1166: reset {current:?}");
            rst.set_state(current.level()).map_err(|err| {
                log::warn!("Error driving reset pin: {err:?}");
                Error::ResetPin
            })?;
            self.delay.delay_ms(settle_ms).await;
            step = current.next();
        }
        Ok(())
    }

    async fn validate(&mut self) -> Result<(), Error<ErrorType>> {
        self.state = SetupState::Validating;
        self.identity = Identity::default();

        let product_id = self.read_register(reg::PRODUCT_ID).await?;
        let manufacturer_id = self.read_register(reg::MANUFACTURER_ID).await?;
        let revision = self.read_register(reg::REVISION).await?;
        self.identity = Identity {
            product_id,
            manufacturer_id,
            revision,
        };
        log::trace!("cap1166: identity {:?}", self.identity);

        if !self.identity.is_cap1166() {
            log::error!(
                "Product ID or Manufacture ID of the connected device does not match a known CAP1166."
            );
            return Err(Error::CommunicationFailed(self.identity));
        }
        Ok(())
    }

    async fn configure(&mut self) -> Result<(), Error<ErrorType>> {
        self.state = SetupState::Configuring;

        let threshold = self.config.touch_threshold & reg::SENSITIVITY_THRESHOLD_MASK;
        self.modify_register(reg::SENSITIVITY_CONTROL, |v| {
            (v & !reg::SENSITIVITY_THRESHOLD_MASK) | threshold
        })
        .await?;

        self.write_register(reg::MULTIPLE_TOUCH_CONFIG, self.config.multi_touch.register_value())
            .await?;

        let link = self.led_link_mask();
        log::debug!("cap1166: LED link mask 0x{link:02x}");
        self.write_register(reg::LED_LINKING, link).await?;

        self.write_register(reg::STANDBY_CONFIG, reg::STANDBY_TUNING).await?;

        for behavior in LedBehavior::ALL {
            let duty = self.behavior_brightness(behavior);
            let value = duty.register_value();
            log::debug!(
                "cap1166: {behavior:?} brightness min={} max={} (reg 0x{:02x} = 0x{value:02x})",
                duty.min,
                duty.max,
                behavior.duty_register()
            );
            self.write_register(behavior.duty_register(), value).await?;
        }

        for i in 0..self.led_channels.len() {
            let led = self.led_channels[i];
            self.write_led_behavior(led.channel(), led.behavior()).await?;
        }

        self.state = SetupState::Ready;
        log::trace!("cap1166: setup done");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_sequence_is_low_high_low() {
        let mut levels = [PinState::High; 3];
        let mut step = Some(ResetStep::DriveLow);
        let mut n = 0;
        while let Some(current) = step {
            levels[n] = current.level();
            n += 1;
            step = current.next();
        }
        assert_eq!(n, 3);
        assert_eq!(levels, [PinState::Low, PinState::High, PinState::Low]);
    }
}
