mod gpio;

use std::fmt::Debug;
use crate::GpioResult;
pub use gpio::*;

/// The `Keypad` trait defines the interface for keypad input devices.
pub trait Keypad: Debug {
    type Key;

    /// Scans the keypad once and returns the pressed key, if any.
    fn scan(&self) -> GpioResult<Option<Self::Key>>;
}
