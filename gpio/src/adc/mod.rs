mod iio;

use std::fmt::Debug;
use crate::GpioResult;
pub use iio::*;

/// A single analog input channel.
pub trait AnalogInput: Debug {
    /// Reads the channel as a fraction of the reference rail, nominally
    /// in [0.0, 1.0].
    ///
    /// The value is deliberately not clamped; a reading outside the rail
    /// (broken wiring, wrong scale) propagates to the caller as-is.
    fn read_fraction(&self) -> GpioResult<f64>;
}
