//! Temperature and gas sampling, normalized into a single hazard flag.

use std::fmt::Debug;
use vigil_gpio::adc::AnalogInput;
use vigil_gpio::{GpioInput, GpioResult};

/// Reference rail of the ADC, volts.
pub const VREF_VOLTS: f64 = 3.3;
/// Sensor slope: an LM35-style part outputs 10 mV per degree Celsius.
pub const VOLTS_PER_DEG_C: f64 = 0.01;
/// Temperatures above this trip the alarm.
pub const TEMP_LIMIT_C: f64 = 50.0;

/// One poll's worth of sensor readings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensorSample {
    pub temp_c: f64,
    pub gas_active: bool,
}

impl SensorSample {
    /// Whether this sample constitutes a hazard: gas detected, or the
    /// temperature over the limit. A single sample decides; there is no
    /// smoothing or hysteresis, so a noisy reading can flip the state.
    pub fn hazard(&self) -> bool {
        self.gas_active || self.temp_c > TEMP_LIMIT_C
    }
}

/// Converts a normalized ADC fraction into degrees Celsius.
///
/// Out-of-range fractions are not clamped; they produce out-of-range
/// temperatures and possibly a spurious hazard, which is the documented
/// failure mode of a miswired sensor.
pub fn temp_c_from_fraction(fraction: f64) -> f64 {
    fraction * VREF_VOLTS / VOLTS_PER_DEG_C
}

/// Reads the temperature and gas sensors behind their capability traits.
///
/// The gas input is expected to be configured active-low with a pull-up,
/// so `read()` already answers "gas detected?".
pub struct SensorMonitor<'a> {
    temp: &'a dyn AnalogInput,
    gas: &'a dyn GpioInput,
}

impl Debug for SensorMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SensorMonitor({:?}, {:?})", self.temp, self.gas)
    }
}

impl <'a> SensorMonitor<'a> {
    pub fn new(temp: &'a dyn AnalogInput, gas: &'a dyn GpioInput) -> Self {
        SensorMonitor { temp, gas }
    }

    pub fn sample(&self) -> GpioResult<SensorSample> {
        Ok(SensorSample {
            temp_c: temp_c_from_fraction(self.temp.read_fraction()?),
            gas_active: self.gas.read()?,
        })
    }
}
