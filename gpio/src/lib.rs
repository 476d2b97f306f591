pub mod gpiod;
pub mod keypad;
pub mod adc;
pub mod pwm;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("pin already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

pub trait GpioDriver: Debug {
    /// Gets the amount of GPIO pins available.
    fn count(&self) -> GpioResult<usize>;

    /// Gets the GPIO pin at the given index.
    fn get_pin(&self, index: usize) -> GpioResult<Box<dyn GpioPin + '_>>;

    /// Gets the GPIO pin bus at the specific indices.
    fn get_pin_bus<const N: usize>(
        &self,
        indices: [usize; N],
    ) -> GpioResult<Box<dyn GpioBus<N> + '_>>;
}

/// Specifies the active level of the GPIO pin.
///
/// By default, the active level is high. Active-low lines (keypad rows and
/// columns, the gas sensor) invert the logical value at the boundary so
/// the rest of the system only sees "active or not".
#[derive(Copy, Clone, Debug, Default)]
pub enum GpioActiveLevel {
    #[default] High,
    Low,
}

impl GpioActiveLevel {
    /// Gets the real state that will be outputted on the GPIO pin based on the active level and the value.
    pub fn get_state(&self, value: bool) -> bool {
        match self {
            GpioActiveLevel::High => value,
            GpioActiveLevel::Low => !value,
        }
    }
}

/// Specifies the bias of the GPIO pin.
///
/// You can use this to enable pull-up or pull-down resistors.
/// These should work in both input and output modes.
#[derive(Copy, Clone, Debug, Default)]
pub enum GpioBias {
    #[default] None,
    PullUp,
    PullDown,
}

/// Specifies the drive mode of the GPIO pin.
///
/// Works only in output mode.
///
/// By default, the drive mode is push-pull, which drives the pin high or low
/// with low impedance. Open-drain leaves the pin floating when inactive,
/// which is what the keypad row lines want so that two simultaneously
/// pressed keys cannot short a driven-high row against a driven-low one.
#[derive(Copy, Clone, Debug, Default)]
pub enum GpioDriveMode {
    /// GPIO pin is driven high or low with low impedance.
    #[default] PushPull,
    /// GPIO pin is driven low or left floating when high.
    OpenDrain,
    /// GPIO pin is driven high or left floating when low.
    OpenSource,
}

pub trait GpioPin: Debug {
    /// Sets the GPIO pin function to input, allowing reading its state.
    fn as_input(&mut self) -> GpioResult<Box<dyn GpioInput + '_>>;
    /// Sets the GPIO pin function to output, allowing writing its state.
    fn as_output(&mut self) -> GpioResult<Box<dyn GpioOutput + '_>>;

    /// Gets whether the GPIO pin supports active level.
    fn supports_active_level(&self) -> bool {
        false
    }
    /// Gets the active level of the GPIO pin.
    fn active_level(&self) -> GpioActiveLevel {
        GpioActiveLevel::High
    }
    /// Sets the active level of the GPIO pin.
    ///
    /// # Errors
    /// - `GpioError::NotSupported` if the pin does not support active level.
    fn set_active_level(&mut self, _level: GpioActiveLevel) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }

    /// Gets whether the GPIO pin supports bias (pull-up/pull-down resistors).
    fn supports_bias(&self) -> bool {
        false
    }
    /// Gets the bias of the GPIO pin.
    fn bias(&self) -> GpioBias {
        GpioBias::None
    }
    /// Sets the bias of the GPIO pin.
    ///
    /// # Errors
    /// - `GpioError::NotSupported` if the pin does not support bias.
    fn set_bias(&mut self, _bias: GpioBias) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }

    /// Gets whether the GPIO pin supports drive mode (push-pull, open-drain, open-source).
    fn supports_drive_mode(&self) -> bool {
        false
    }
    /// Gets the drive mode of the GPIO pin.
    fn drive_mode(&self) -> GpioDriveMode {
        GpioDriveMode::PushPull
    }
    /// Sets the drive mode of the GPIO pin.
    ///
    /// # Errors
    /// - `GpioError::NotSupported` if the pin does not support drive mode.
    fn set_drive_mode(&mut self, _mode: GpioDriveMode) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }
}

pub trait GpioInput: Debug {
    /// Reads the state of the GPIO pin.
    fn read(&self) -> GpioResult<bool>;
}

pub trait GpioOutput: Debug {
    /// Writes the state of the GPIO pin.
    fn write(&self, value: bool) -> GpioResult<()>;
}

pub trait GpioBus<const N: usize>: Debug {
    fn as_input(&mut self) -> GpioResult<Box<dyn GpioBusInput<N> + '_>>;
    fn as_output(&mut self) -> GpioResult<Box<dyn GpioBusOutput<N> + '_>>;

    fn supports_active_level(&self) -> bool {
        false
    }
    fn active_level(&self) -> GpioActiveLevel {
        GpioActiveLevel::High
    }
    fn set_active_level(&mut self, _level: GpioActiveLevel) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }

    fn supports_bias(&self) -> bool {
        false
    }
    fn bias(&self) -> GpioBias {
        GpioBias::None
    }
    fn set_bias(&mut self, _bias: GpioBias) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }

    fn supports_drive_mode(&self) -> bool {
        false
    }
    fn drive_mode(&self) -> GpioDriveMode {
        GpioDriveMode::PushPull
    }
    fn set_drive_mode(&mut self, _mode: GpioDriveMode) -> GpioResult<()> {
        Err(GpioError::NotSupported)
    }
}

pub trait GpioBusInput<const N: usize>: Debug {
    /// Reads all lines of the bus at once, index 0 first.
    fn read(&self) -> GpioResult<[bool; N]>;
}

pub trait GpioBusOutput<const N: usize>: Debug {
    /// Writes all lines of the bus at once, index 0 first.
    fn write(&self, values: &[bool; N]) -> GpioResult<()>;
}
