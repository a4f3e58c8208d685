#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those     holding buffers for the duration of a data transfer."
)]

use cap1166_async::{
    Cap1166, Config, LedBehavior, LedChannel, TouchListener, TouchSensor, TouchStatus,
};
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_hal::i2c::master::I2c;
use esp_hal::Async;
use esp_hal::{
    clock::CpuClock,
    gpio::{Level, Output, OutputConfig},
    time::Rate,
    timer::systimer::SystemTimer,
};
use esp_println::println;
use log::{info, warn};
use tca9554_async::{Address, GpioPin, Tca9554};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("{}", info);
    loop {}
}

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

type TouchPanel = Cap1166<I2c<'static, Async>, Output<'static>, Delay>;
type Expander = Tca9554<I2c<'static, Async>>;

/// Touch inputs whose state is mirrored on the expander outputs.
const MIRRORED_INPUTS: u8 = 4;

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    esp_println::logger::init_logger(log::LevelFilter::Debug);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 32 * 1024);

    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    let i2c_config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(100));

    let touch_i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap()
        .with_sda(peripherals.GPIO13)
        .with_scl(peripherals.GPIO14)
        .into_async();
    let touch_rst = Output::new(peripherals.GPIO45, Level::Low, OutputConfig::default());

    let config = Config::default()
        .with_touch_threshold(0x0A)
        .with_multiple_touches(true);
    let mut panel = Cap1166::new(touch_i2c, Some(touch_rst), Delay, config);
    for channel in 0..6 {
        panel.register_touch_sensor(TouchSensor::new(channel)).unwrap();
    }
    panel
        .register_led_channel(LedChannel::new(0).with_behavior(LedBehavior::Breathe))
        .unwrap();
    panel
        .register_led_channel(LedChannel::new(5).independent())
        .unwrap();
    panel.set_behavior_brightness(LedBehavior::Breathe, 77, 7);

    match panel.setup().await {
        Ok(_) => log::debug!("Touch panel initialized."),
        Err(err) => log::warn!("Error initializing touch panel: {err}"),
    };
    panel.dump_config();

    let expander_i2c = I2c::new(peripherals.I2C1, i2c_config)
        .unwrap()
        .with_sda(peripherals.GPIO39)
        .with_scl(peripherals.GPIO40)
        .into_async();
    let mut expander = Tca9554::new(expander_i2c, Address::default());
    if let Err(err) = expander.setup().await {
        log::warn!("Error initializing expander: {err}");
    }
    for n in 0..MIRRORED_INPUTS {
        if let Ok(mut pin) = expander.pin(GpioPin::output(n)) {
            if let Err(err) = pin.setup().await {
                warn!("Pin {} setup failed: {err}", pin.config());
            }
        }
    }
    expander.dump_config();

    spawner.spawn(read_touch(panel, expander)).unwrap();

    info!("Setup complete. Entering idle loop.");
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Counts touches across all polls.
#[derive(Default)]
struct TouchCounter {
    touches: u32,
    last: TouchStatus,
}

impl TouchListener for TouchCounter {
    fn on_touch_status(&mut self, status: TouchStatus) {
        let new = status.0 & !self.last.0;
        self.touches += new.count_ones();
        self.last = status;
    }
}

/// Polls the panel, mirrors inputs on the expander and keeps LED 5 lit
/// while input 5 is touched.
#[embassy_executor::task]
async fn read_touch(mut panel: TouchPanel, mut expander: Expander) {
    let mut counter = TouchCounter::default();
    let mut led_on = false;
    loop {
        match panel.poll_into(&mut counter).await {
            Ok(Some(status)) => {
                for n in 0..MIRRORED_INPUTS {
                    if let Err(err) = expander.digital_write(n, status.is_touched(n)).await {
                        warn!("Error mirroring input {n}: {err}");
                    }
                }
                if status.is_touched(5) != led_on {
                    led_on = status.is_touched(5);
                    if let Some(mut led) = panel.led(5) {
                        if let Err(err) = led.write_state(led_on).await {
                            warn!("Error switching LED: {err}");
                        }
                    }
                }
                if status.any() {
                    info!("Touches {:06b}, {} so far", status.0, counter.touches);
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!("Error polling touch panel: {err}");
            }
        }
        expander.reset_pin_cache();
        Timer::after(Duration::from_millis(20)).await;
    }
}
