//! Analog input via the Linux industrial I/O (IIO) sysfs interface.
//!
//! An external ADC (e.g. an MCP3008 behind the `mcp320x` driver) shows up
//! as `/sys/bus/iio/devices/iio:deviceN` with one `in_voltageX_raw` file
//! per channel and an `in_voltageX_scale` (or shared `in_voltage_scale`)
//! giving millivolts per count.

use crate::adc::AnalogInput;
use crate::{GpioError, GpioResult};
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

pub struct IioAnalogInput {
    base_path: PathBuf,
    channel: usize,
    reference_volts: f64,
}

impl IioAnalogInput {
    /// Opens channel `channel` of IIO device `device`, reporting readings
    /// as a fraction of `reference_volts`.
    pub fn open(device: usize, channel: usize, reference_volts: f64) -> GpioResult<Self> {
        let base_path = Path::new("/sys/bus/iio/devices").join(format!("iio:device{}", device));
        if !base_path.exists() {
            return Err(GpioError::InvalidArgument);
        }
        if !base_path.join(format!("in_voltage{}_raw", channel)).exists() {
            return Err(GpioError::InvalidArgument);
        }
        Ok(IioAnalogInput {
            base_path,
            channel,
            reference_volts,
        })
    }

    fn read_attr(&self, name: &str) -> GpioResult<f64> {
        let path = self.base_path.join(name);
        let content = std::fs::read_to_string(&path)?;
        content
            .trim()
            .parse()
            .map_err(|_| GpioError::Other(format!("parsing IIO attribute {} failed", name)))
    }

    /// Millivolts per raw count. Falls back to the device-wide scale when
    /// the channel has no dedicated one.
    fn scale_mv(&self) -> GpioResult<f64> {
        self.read_attr(&format!("in_voltage{}_scale", self.channel))
            .or_else(|_| self.read_attr("in_voltage_scale"))
    }
}

impl Debug for IioAnalogInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "IioAnalogInput({:?}, ch {})", self.base_path, self.channel)
    }
}

impl AnalogInput for IioAnalogInput {
    fn read_fraction(&self) -> GpioResult<f64> {
        let raw = self.read_attr(&format!("in_voltage{}_raw", self.channel))?;
        let volts = raw * self.scale_mv()? / 1000.0;
        Ok(volts / self.reference_volts)
    }
}
