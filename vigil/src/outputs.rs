//! The indicator LED and buzzer output stage.

use std::fmt::Debug;
use std::time::Duration;
use vigil_gpio::pwm::{PwmExtension, PwmPin};
use vigil_gpio::{GpioOutput, GpioResult};

/// Buzzer carrier period: 2 kHz.
pub const BUZZER_PERIOD: Duration = Duration::from_micros(500);

/// Drives the LED and buzzer off the hazard flag.
///
/// The LED mirrors the flag directly; the buzzer runs a fixed 2 kHz
/// carrier at 50% duty while the hazard holds and is disabled otherwise.
/// Temperature and gas hazards sound identical. The PWM pin is only
/// reprogrammed when the flag actually changes, so steady-state polls
/// cost nothing on the sysfs backend.
pub struct OutputController<'a> {
    led: &'a dyn GpioOutput,
    buzzer: &'a mut dyn PwmPin,
    driven: Option<bool>,
}

impl Debug for OutputController<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OutputController({:?}, {:?})", self.led, self.buzzer)
    }
}

impl <'a> OutputController<'a> {
    pub fn new(led: &'a dyn GpioOutput, buzzer: &'a mut dyn PwmPin) -> Self {
        OutputController {
            led,
            buzzer,
            driven: None,
        }
    }

    /// Applies the hazard flag to both outputs.
    pub fn drive(&mut self, hazard: bool) -> GpioResult<()> {
        if self.driven == Some(hazard) {
            return Ok(());
        }

        self.led.write(hazard)?;
        if hazard {
            self.buzzer.set_period(BUZZER_PERIOD)?;
            self.buzzer.set_duty(BUZZER_PERIOD / 2)?;
            self.buzzer.enable()?;
        } else {
            self.buzzer.disable()?;
        }

        self.driven = Some(hazard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use vigil_gpio::pwm::PwmPolarity;

    #[derive(Debug, Default)]
    struct FakeLed {
        lit: Cell<bool>,
        writes: Cell<usize>,
    }

    impl GpioOutput for FakeLed {
        fn write(&self, value: bool) -> GpioResult<()> {
            self.lit.set(value);
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct FakeBuzzer {
        period_ns: u32,
        duty_ns: u32,
        enabled: bool,
    }

    impl PwmPin for FakeBuzzer {
        fn period_ns(&self) -> GpioResult<u32> {
            Ok(self.period_ns)
        }
        fn set_period_ns(&mut self, period_ns: u32) -> GpioResult<()> {
            self.period_ns = period_ns;
            Ok(())
        }
        fn duty_ns(&self) -> GpioResult<u32> {
            Ok(self.duty_ns)
        }
        fn set_duty_ns(&mut self, duty_ns: u32) -> GpioResult<()> {
            self.duty_ns = duty_ns;
            Ok(())
        }
        fn polarity(&self) -> GpioResult<PwmPolarity> {
            Ok(PwmPolarity::Normal)
        }
        fn set_polarity(&mut self, _polarity: PwmPolarity) -> GpioResult<()> {
            Ok(())
        }
        fn is_enabled(&self) -> GpioResult<bool> {
            Ok(self.enabled)
        }
        fn enable(&mut self) -> GpioResult<()> {
            self.enabled = true;
            Ok(())
        }
        fn disable(&mut self) -> GpioResult<()> {
            self.enabled = false;
            Ok(())
        }
    }

    #[test]
    fn hazard_lights_the_led_and_sounds_a_2khz_half_duty_carrier() {
        let led = FakeLed::default();
        let mut buzzer = FakeBuzzer::default();
        let mut outputs = OutputController::new(&led, &mut buzzer);

        outputs.drive(true).unwrap();

        assert!(led.lit.get());
        assert!(buzzer.enabled);
        assert_eq!(buzzer.period_ns, 500_000);
        assert_eq!(buzzer.duty_ns, 250_000);
    }

    #[test]
    fn quiet_clears_the_led_and_silences_the_buzzer() {
        let led = FakeLed::default();
        let mut buzzer = FakeBuzzer::default();
        let mut outputs = OutputController::new(&led, &mut buzzer);

        outputs.drive(true).unwrap();
        outputs.drive(false).unwrap();

        assert!(!led.lit.get());
        assert!(!buzzer.enabled);
    }

    #[test]
    fn steady_state_does_not_rewrite_the_outputs() {
        let led = FakeLed::default();
        let mut buzzer = FakeBuzzer::default();
        let mut outputs = OutputController::new(&led, &mut buzzer);

        for _ in 0..10 {
            outputs.drive(true).unwrap();
        }

        assert_eq!(led.writes.get(), 1);
    }
}
