//! Plain-text output over the serial console.
//!
//! The console is write-only as far as the controller is concerned; this
//! is the whole wire format downstream tooling sees, so the line shapes
//! here are load-bearing.

use std::io::Write;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use vigil_gpio::{GpioError, GpioResult};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn format_timestamp(at: OffsetDateTime) -> GpioResult<String> {
    at.format(&TIMESTAMP_FORMAT)
        .map_err(|e| GpioError::Other(format!("formatting timestamp failed: {}", e)))
}

/// Formats controller events onto any byte-oriented write channel.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl <W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    /// Unwraps the underlying write channel.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Echoes one acknowledgment character for an accepted digit. The
    /// digit itself is masked.
    pub fn ack(&mut self) -> GpioResult<()> {
        self.out.write_all(b"*")?;
        self.out.flush()?;
        Ok(())
    }

    /// Announces a freshly logged alarm onset.
    pub fn alarm(&mut self, at: OffsetDateTime) -> GpioResult<()> {
        writeln!(self.out, "ALARM at {}", format_timestamp(at)?)?;
        self.out.flush()?;
        Ok(())
    }

    /// Prints the retained history, oldest first.
    pub fn dump(&mut self, entries: &[OffsetDateTime]) -> GpioResult<()> {
        writeln!(self.out, "Alarm history ({} events):", entries.len())?;
        for &at in entries {
            writeln!(self.out, "ALARM at {}", format_timestamp(at)?)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
