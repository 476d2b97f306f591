mod alarm;
mod app;
mod clock;
mod config;
mod entry;
mod history;
mod outputs;
mod report;
mod sensors;

use std::env::var;
use std::fs::OpenOptions;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use dotenv::dotenv;
use log::{debug, info};
use vigil_gpio::GpioActiveLevel::Low;
use vigil_gpio::GpioBias::PullUp;
use vigil_gpio::GpioDriveMode::OpenDrain;
use vigil_gpio::GpioDriver;
use vigil_gpio::adc::IioAnalogInput;
use vigil_gpio::gpiod::GpiodDriver;
use vigil_gpio::keypad::GpioKeypad;
use vigil_gpio::pwm::{PwmDriver, PwmPolarity, SysfsPwmDriver};
use crate::app::App;
use crate::clock::{SystemClock, WallClock};
use crate::config::Config;
use crate::outputs::OutputController;
use crate::report::ConsoleReporter;
use crate::sensors::{SensorMonitor, VREF_VOLTS};

fn parse_pin_bus(pin_str: &str) -> eyre::Result<[usize; 4]> {
    pin_str
        .split([',', ' ', ';'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()?
        .try_into()
        .map_err(|_| eyre::eyre!("Invalid number of keypad pins"))
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("Vigil starting...");

    // Get pin numbers from env
    let keypad_pin_row_nos: [usize; 4] = parse_pin_bus(&var("VIGIL_KEYPAD_PINS_ROWS")?)?;
    let keypad_pin_col_nos: [usize; 4] = parse_pin_bus(&var("VIGIL_KEYPAD_PINS_COLS")?)?;
    let led_pin_no: usize = var("VIGIL_PIN_LED")?.parse()?;
    let gas_pin_no: usize = var("VIGIL_PIN_GAS")?.parse()?;
    let pwm_chip_no: usize = var("VIGIL_PWM_CHIP")?.parse()?;
    let pwm_channel_no: usize = var("VIGIL_PWM_CHANNEL")?.parse()?;
    let adc_device_no: usize = var("VIGIL_ADC_DEVICE")?.parse()?;
    let adc_channel_no: usize = var("VIGIL_ADC_CHANNEL")?.parse()?;

    info!("Keypad @ Rows: {:?}, Cols: {:?}", keypad_pin_row_nos, keypad_pin_col_nos);
    info!(
        "LED @ {}, Gas @ {}, Buzzer @ pwmchip{}/pwm{}, Temp @ iio:device{}/ch{}",
        led_pin_no, gas_pin_no, pwm_chip_no, pwm_channel_no, adc_device_no, adc_channel_no,
    );

    debug!("Initializing GPIO driver...");
    let gpio_chip = var("VIGIL_GPIO_CHIP").unwrap_or_else(|_| "/dev/gpiochip0".to_string());
    let gpio = GpiodDriver::open(&gpio_chip)?;
    debug!("{:?} initialized.", gpio);

    debug!("Initializing keypad...");
    let mut keypad_row_bus = gpio.get_pin_bus(keypad_pin_row_nos)?;
    let mut keypad_col_bus = gpio.get_pin_bus(keypad_pin_col_nos)?;
    keypad_row_bus.set_drive_mode(OpenDrain)?;
    keypad_row_bus.set_active_level(Low)?;
    keypad_col_bus.set_bias(PullUp)?;
    keypad_col_bus.set_active_level(Low)?;
    let keypad_row_out = keypad_row_bus.as_output()?;
    let keypad_col_in = keypad_col_bus.as_input()?;

    let keypad = GpioKeypad::new(&*keypad_row_out, &*keypad_col_in);

    debug!("{:?} initialized.", keypad);

    debug!("Initializing sensors...");
    let mut gas_pin = gpio.get_pin(gas_pin_no)?;
    gas_pin.set_bias(PullUp)?;
    gas_pin.set_active_level(Low)?;
    let gas_in = gas_pin.as_input()?;
    let temp_in = IioAnalogInput::open(adc_device_no, adc_channel_no, VREF_VOLTS)?;
    let sensors = SensorMonitor::new(&temp_in, &*gas_in);

    debug!("{:?} initialized.", sensors);

    debug!("Initializing outputs...");
    let mut led_pin = gpio.get_pin(led_pin_no)?;
    let led_out = led_pin.as_output()?;
    let pwm = SysfsPwmDriver::get_chip(pwm_chip_no)?;
    let mut buzzer = pwm.get_pin(pwm_channel_no)?;
    buzzer.set_polarity(PwmPolarity::Normal)?;
    buzzer.disable()?;
    let outputs = OutputController::new(&*led_out, &mut *buzzer);

    debug!("{:?} initialized.", outputs);

    // The console defaults to stdout; point VIGIL_CONSOLE at a serial
    // device (e.g. /dev/serial0) to report over the wire instead.
    let console: Box<dyn Write> = match var("VIGIL_CONSOLE") {
        Ok(path) => Box::new(OpenOptions::new().write(true).open(path)?),
        Err(_) => Box::new(std::io::stdout()),
    };
    let reporter = ConsoleReporter::new(console);

    debug!("Trying to load config...");
    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };

    info!("Vigil initialized.");

    let clock = SystemClock;
    let mut app = App::new(&config, &keypad, sensors, outputs, reporter);

    info!("Starting main loop...");

    loop {
        let tick = Instant::now();
        app.update(clock.now(), tick)?;

        thread::sleep(sleep_budget(config.poll_period(), tick.elapsed()));
    }
}

/// The portion of the poll period left after a cycle's work, so the cycle
/// time stays at the configured period rather than work plus period.
/// Zero when the work overran the period.
fn sleep_budget(period: Duration, elapsed: Duration) -> Duration {
    period.saturating_sub(elapsed)
}
