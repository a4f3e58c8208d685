use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
use tca9554_async::{Address, Error, GpioPin, Mode, Tca9554};
use tokio_test::block_on;

const ADDR: u8 = 0x38;

fn read(reg: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write_read(ADDR, vec![reg], vec![value])
}

fn write(reg: u8, value: u8) -> I2cTransaction {
    I2cTransaction::write(ADDR, vec![reg, value])
}

#[test]
fn setup_reads_modes_and_outputs() {
    let expectations = [read(0x03, 0xF0), read(0x01, 0x0A)];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    let result = block_on(expander.setup());
    assert!(result.is_ok());
    assert!(!expander.is_failed());
    assert_eq!(expander.mode_mask(), 0xF0);
    assert_eq!(expander.output_mask(), 0x0A);

    i2c.done();
}

#[test]
fn setup_failure_marks_device_failed() {
    let expectations = [read(0x03, 0xFF), read(0x01, 0x00).with_error(ErrorKind::Other)];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    let result = block_on(expander.setup());
    assert!(matches!(result, Err(Error::I2c(ErrorKind::Other))));
    assert!(expander.is_failed());

    // No bus traffic once failed.
    assert!(matches!(block_on(expander.digital_write(0, true)), Err(Error::Failed)));
    assert!(matches!(block_on(expander.pin_mode(0, Mode::Output)), Err(Error::Failed)));
    assert!(matches!(block_on(expander.digital_read(0)), Err(Error::Failed)));

    i2c.done();
}

#[test]
fn pin_mode_updates_configuration_register() {
    let expectations = [
        read(0x03, 0xFF),
        read(0x01, 0xFF),
        write(0x03, 0xFE),
        write(0x03, 0x7E),
        write(0x03, 0xFE),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();
    block_on(expander.pin_mode(0, Mode::Output)).unwrap();
    block_on(expander.pin_mode(7, Mode::Output)).unwrap();
    block_on(expander.pin_mode(7, Mode::Input)).unwrap();
    assert_eq!(expander.mode_mask(), 0xFE);

    i2c.done();
}

#[test]
fn digital_write_keeps_other_outputs() {
    let expectations = [
        read(0x03, 0x00),
        read(0x01, 0x81),
        write(0x01, 0x85),
        write(0x01, 0x84),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();
    block_on(expander.digital_write(2, true)).unwrap();
    block_on(expander.digital_write(0, false)).unwrap();
    assert_eq!(expander.output_mask(), 0x84);

    i2c.done();
}

#[test]
fn digital_read_is_cached_until_reset() {
    let expectations = [
        read(0x03, 0xFF),
        read(0x01, 0xFF),
        read(0x00, 0b0000_1010),
        // after the cache reset
        read(0x00, 0b0000_0000),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();

    // One register read serves every pin until the cache is reset.
    assert!(block_on(expander.digital_read(1)).unwrap());
    assert!(block_on(expander.digital_read(1)).unwrap());
    assert!(block_on(expander.digital_read(3)).unwrap());
    assert!(!block_on(expander.digital_read(0)).unwrap());

    expander.reset_pin_cache();
    assert!(!block_on(expander.digital_read(1)).unwrap());
    assert!(!block_on(expander.digital_read(3)).unwrap());

    i2c.done();
}

#[test]
fn read_error_sets_warning() {
    let expectations = [
        read(0x03, 0xFF),
        read(0x01, 0xFF),
        read(0x00, 0x00).with_error(ErrorKind::Other),
        read(0x00, 0x01),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();

    assert!(block_on(expander.digital_read(0)).is_err());
    assert!(expander.has_warning());
    assert!(!expander.is_failed());

    // The failed read left the cache invalid.
    assert!(block_on(expander.digital_read(0)).unwrap());
    assert!(!expander.has_warning());

    i2c.done();
}

#[test]
fn invalid_pin_is_rejected() {
    let expectations = [read(0x03, 0xFF), read(0x01, 0xFF)];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();

    assert!(matches!(block_on(expander.digital_write(8, true)), Err(Error::InvalidPin(8))));
    assert!(matches!(expander.pin(GpioPin::input(9)), Err(Error::InvalidPin(9))));

    i2c.done();
}

#[test]
fn inverted_pin_handle() {
    let addr = 0x21;
    let expectations = [
        I2cTransaction::write_read(addr, vec![0x03], vec![0xFF]),
        I2cTransaction::write_read(addr, vec![0x01], vec![0x00]),
        I2cTransaction::write(addr, vec![0x03, 0xEF]),
        // logical high on an inverted pin drives the output low
        I2cTransaction::write(addr, vec![0x01, 0x00]),
        I2cTransaction::write(addr, vec![0x01, 0x10]),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::tca9554(1));
    block_on(expander.setup()).unwrap();

    let mut pin = expander.pin(GpioPin::output(4).inverted()).unwrap();
    block_on(pin.setup()).unwrap();
    block_on(pin.set_high()).unwrap();
    block_on(pin.set_low()).unwrap();

    i2c.done();
}

#[test]
fn inverted_input_reads_logical_level() {
    let expectations = [
        read(0x03, 0xFF),
        read(0x01, 0xFF),
        write(0x03, 0xFF),
        read(0x00, 0b0100_0000),
    ];
    let mut i2c = I2cMock::new(&expectations);

    let mut expander = Tca9554::new(&mut i2c, Address::default());
    block_on(expander.setup()).unwrap();

    let mut pin = expander.pin(GpioPin::input(6).inverted()).unwrap();
    block_on(pin.setup()).unwrap();
    assert!(block_on(pin.is_low()).unwrap());
    assert!(!block_on(pin.is_high()).unwrap());

    i2c.done();
}
