use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ScannerSettings;
use crate::gpio::Switch;

use super::debounce::ScanDebounce;
use super::{ScanError, ScanEvent, TagScanner};

/// How long to sleep between gate checks while scanning is disabled.
const GATE_BACKOFF: Duration = Duration::from_secs(1);

/// Outcome of one poll.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Event(ScanEvent),
    /// Nothing new; poll again right away.
    Idle,
    /// Nothing new; wait this long before polling again.
    Backoff(Duration),
}

/// One scanner thread's state: reader, optional gate and debounce.
pub struct ScanLoop<S> {
    scanner: S,
    gate: Option<Box<dyn Switch + Send>>,
    debounce: ScanDebounce,
    poll_timeout: Duration,
    gated: bool,
}

impl<S: TagScanner> ScanLoop<S> {
    pub fn new(scanner: S, gate: Option<Box<dyn Switch + Send>>, settings: &ScannerSettings) -> Self {
        Self {
            scanner,
            gate,
            debounce: ScanDebounce::new(settings.cooldown()),
            poll_timeout: settings.poll_timeout(),
            gated: false,
        }
    }

    /// Poll once. Only `ScanError::Closed` ends the loop; other read errors
    /// are logged and turned into a backoff.
    pub fn step(&mut self, now: Instant) -> Result<Step, ScanError> {
        if let Some(gate) = &self.gate {
            match gate.is_on() {
                Ok(true) => self.gated = false,
                Ok(false) => {
                    if self.gated {
                        return Ok(Step::Backoff(GATE_BACKOFF));
                    }
                    self.gated = true;
                    self.debounce.clear();
                    return Ok(Step::Event(ScanEvent::Gated));
                }
                Err(err) => warn!(error = %err, "cannot read scan gate, scanning anyway"),
            }
        }

        match self.scanner.poll(self.poll_timeout) {
            Ok(polled) => Ok(match self.debounce.observe(polled.as_deref(), now) {
                Some(id) => Step::Event(ScanEvent::Tag(id)),
                None => Step::Idle,
            }),
            Err(ScanError::Closed) => Err(ScanError::Closed),
            Err(err) => {
                debug!(error = %err, "tag read failed");
                Ok(Step::Backoff(self.poll_timeout))
            }
        }
    }
}

/// Run `scan_loop` on its own thread until the input closes or the
/// controller goes away.
pub fn spawn_scanner<S>(mut scan_loop: ScanLoop<S>, tx: Sender<ScanEvent>) -> JoinHandle<()>
where
    S: TagScanner + Send + 'static,
{
    thread::spawn(move || {
        loop {
            match scan_loop.step(Instant::now()) {
                Ok(Step::Event(event)) => {
                    debug!(?event, "scan event");
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(Step::Idle) => {}
                Ok(Step::Backoff(d)) => thread::sleep(d),
                Err(err) => {
                    info!(error = %err, "scanner stopped");
                    break;
                }
            }
        }
    })
}
