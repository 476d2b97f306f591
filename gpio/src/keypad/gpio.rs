use std::fmt::{Debug, Formatter};
use crate::{GpioBusInput, GpioBusOutput, GpioResult};
use crate::keypad::Keypad;

/// The character layout of a standard 4x4 membrane keypad, row-major.
pub const KEY_LAYOUT: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// A 4x4 matrix keypad scanned over GPIO.
///
/// The four row lines are outputs and the four column lines are inputs with
/// pull-ups. Driving one row active at a time, a pressed key connects its
/// row line to its column line, so the column reads active. Both buses are
/// expected to be configured active-low; this struct only deals in logical
/// levels.
pub struct GpioKeypad<'a> {
    rows: &'a dyn GpioBusOutput<4>,
    cols: &'a dyn GpioBusInput<4>,
}

impl Debug for GpioKeypad<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GpioKeypad({:?}, {:?})", self.rows, self.cols)
    }
}

impl <'a> GpioKeypad<'a> {
    /// Creates a new `GpioKeypad` driving `rows` and reading `cols`.
    pub fn new(rows: &'a dyn GpioBusOutput<4>, cols: &'a dyn GpioBusInput<4>) -> Self {
        GpioKeypad { rows, cols }
    }
}

impl Keypad for GpioKeypad<'_> {
    type Key = char;

    /// Scans row by row and returns the first pressed key found, in
    /// row-major then column-major order. Holds no state between scans;
    /// the row lines are left parked inactive afterwards.
    fn scan(&self) -> GpioResult<Option<char>> {
        for row in 0..4 {
            let mut drive = [false; 4];
            drive[row] = true;
            self.rows.write(&drive)?;

            let cols = self.cols.read()?;
            if let Some(col) = cols.iter().position(|&active| active) {
                self.rows.write(&[false; 4])?;
                return Ok(Some(KEY_LAYOUT[row][col]));
            }
        }

        self.rows.write(&[false; 4])?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Simulates the column side of a keypad with exactly one key held:
    /// the columns read all-inactive unless the pressed key's row is the
    /// one currently driven.
    #[derive(Debug)]
    struct MatrixFixture {
        driven_row: Cell<Option<usize>>,
        pressed: Cell<Option<(usize, usize)>>,
    }

    impl MatrixFixture {
        fn new(pressed: Option<(usize, usize)>) -> Self {
            Self {
                driven_row: Cell::new(None),
                pressed: Cell::new(pressed),
            }
        }
    }

    impl GpioBusOutput<4> for MatrixFixture {
        fn write(&self, values: &[bool; 4]) -> GpioResult<()> {
            self.driven_row.set(values.iter().position(|&v| v));
            Ok(())
        }
    }

    impl GpioBusInput<4> for MatrixFixture {
        fn read(&self) -> GpioResult<[bool; 4]> {
            let mut cols = [false; 4];
            if let (Some(driven), Some((row, col))) = (self.driven_row.get(), self.pressed.get()) {
                if driven == row {
                    cols[col] = true;
                }
            }
            Ok(cols)
        }
    }

    #[test]
    fn every_position_maps_to_its_layout_character() {
        for row in 0..4 {
            for col in 0..4 {
                let fixture = MatrixFixture::new(Some((row, col)));
                let keypad = GpioKeypad::new(&fixture, &fixture);
                assert_eq!(
                    keypad.scan().unwrap(),
                    Some(KEY_LAYOUT[row][col]),
                    "row {row}, col {col}"
                );
            }
        }
    }

    #[test]
    fn idle_matrix_scans_as_none() {
        let fixture = MatrixFixture::new(None);
        let keypad = GpioKeypad::new(&fixture, &fixture);
        assert_eq!(keypad.scan().unwrap(), None);
    }

    #[test]
    fn rows_are_parked_inactive_after_a_scan() {
        let fixture = MatrixFixture::new(Some((2, 1)));
        let keypad = GpioKeypad::new(&fixture, &fixture);
        keypad.scan().unwrap();
        assert_eq!(fixture.driven_row.get(), None);
    }

    #[test]
    fn layout_matches_the_membrane_legend() {
        assert_eq!(KEY_LAYOUT[0], ['1', '2', '3', 'A']);
        assert_eq!(KEY_LAYOUT[3], ['*', '0', '#', 'D']);
    }
}
