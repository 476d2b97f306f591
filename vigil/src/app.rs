//! The module for the main controller state and per-poll logic.

use std::io::Write;
use std::time::Instant;
use log::{debug, info};
use time::OffsetDateTime;
use vigil_gpio::GpioResult;
use vigil_gpio::keypad::Keypad;
use crate::alarm::{AlarmEdge, AlarmTransition};
use crate::config::Config;
use crate::entry::{CodeEntry, EntryEvent};
use crate::history::EventLog;
use crate::outputs::OutputController;
use crate::report::ConsoleReporter;
use crate::sensors::SensorMonitor;

/// The controller: one instance owns all mutable state and is driven by
/// `update` once per poll period.
///
/// Each update runs the four concerns strictly in sequence: keypad scan
/// into the code-entry machine, sensor sampling, alarm edge detection
/// with history writes, and output driving. Nothing in here blocks, so
/// the poll cadence set by the caller is the only timing there is.
pub struct App<'a, W: Write> {
    keypad: &'a dyn Keypad<Key = char>,
    sensors: SensorMonitor<'a>,
    outputs: OutputController<'a>,
    reporter: ConsoleReporter<W>,
    entry: CodeEntry,
    edge: AlarmEdge,
    history: EventLog,
}

impl <'a, W: Write> App<'a, W> {
    pub fn new(
        config: &Config,
        keypad: &'a dyn Keypad<Key = char>,
        sensors: SensorMonitor<'a>,
        outputs: OutputController<'a>,
        reporter: ConsoleReporter<W>,
    ) -> App<'a, W> {
        App {
            keypad,
            sensors,
            outputs,
            reporter,
            entry: CodeEntry::new(config.debounce()),
            edge: AlarmEdge::new(),
            history: EventLog::new(),
        }
    }

    /// Runs one poll cycle at wall-clock time `now` and monotonic time
    /// `tick`.
    pub fn update(&mut self, now: OffsetDateTime, tick: Instant) -> GpioResult<()> {
        let scanned = self.keypad.scan()?;
        match self.entry.poll(scanned, tick) {
            Some(EntryEvent::Digit(_)) => {
                self.reporter.ack()?;
            }
            Some(EntryEvent::Dump) => {
                debug!("history dump requested");
                self.reporter.dump(&self.history.dump())?;
            }
            Some(EntryEvent::Discarded) => {
                debug!("code entry discarded");
            }
            None => {}
        }

        let sample = self.sensors.sample()?;
        let hazard = sample.hazard();
        if self.edge.observe(hazard) == AlarmTransition::Onset {
            info!(
                "hazard onset: {:.1} degC, gas {}",
                sample.temp_c,
                if sample.gas_active { "detected" } else { "clear" },
            );
            if self.history.record(now) {
                self.reporter.alarm(now)?;
            }
        }

        self.outputs.drive(hazard)?;
        Ok(())
    }
}
