//! The prompt/command dialogue engine.
//!
//! [`Exchanger`] drives the fixed dialogue the firmware expects: wait for
//! the prompt delimiter, answer with the configured command, repeat. It is
//! generic over any `Read + Write` transport; production code hands it an
//! opened serial port, tests hand it a scripted mock device.

use crate::config::SerialSettings;
use crate::error::{AppResult, LinkError};
use log::{debug, trace};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Everything read and written over one full dialogue.
#[derive(Debug, Default)]
pub struct ExchangeLog {
    /// Each prompt as read, delimiter included, in arrival order. Contains
    /// one more entry than `commands_sent`: the final read after the loop.
    pub prompts: Vec<String>,
    /// Number of commands written.
    pub commands_sent: u32,
}

/// Blocking prompt/command exchanger over an arbitrary byte transport.
pub struct Exchanger<T> {
    io: T,
    prompt: Vec<u8>,
    wire_command: Vec<u8>,
    rounds: u32,
    deadline: Option<Duration>,
}

impl<T: Read + Write> Exchanger<T> {
    /// Creates an exchanger over `io` with the dialogue parameters from
    /// `settings`.
    pub fn new(io: T, settings: &SerialSettings) -> Self {
        Self {
            io,
            prompt: settings.prompt.clone().into_bytes(),
            wire_command: format!("{}{}", settings.command, settings.line_terminator).into_bytes(),
            rounds: settings.rounds,
            deadline: settings.read_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Overrides the per-read deadline. `None` lets reads block until the
    /// prompt arrives.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Overrides the number of rounds.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Reads until the prompt delimiter has been seen and returns the
    /// decoded text, delimiter included.
    ///
    /// Transport-level `TimedOut`/`WouldBlock` results are treated as "no
    /// data yet": with no deadline configured the read keeps waiting
    /// indefinitely, which is the documented behavior of the original
    /// script. `Ok(0)` from the transport is an unexpected EOF.
    pub fn read_prompt(&mut self) -> AppResult<String> {
        let mut response: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];
        let start = Instant::now();

        loop {
            if let Some(limit) = self.deadline {
                if start.elapsed() > limit {
                    return Err(LinkError::ReadDeadline(limit));
                }
            }

            match self.io.read(&mut byte) {
                Ok(0) => return Err(LinkError::UnexpectedEof),
                Ok(_) => {
                    response.push(byte[0]);
                    if response.ends_with(&self.prompt) {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    continue;
                }
                Err(e) => return Err(LinkError::Io(e)),
            }
        }

        trace!("Read {} bytes up to the prompt delimiter", response.len());
        String::from_utf8(response).map_err(LinkError::Decode)
    }

    /// Writes the configured command plus line terminator and flushes.
    pub fn send_command(&mut self) -> AppResult<()> {
        self.io.write_all(&self.wire_command)?;
        self.io.flush()?;
        trace!(
            "Sent command: '{}'",
            String::from_utf8_lossy(&self.wire_command).escape_default()
        );
        Ok(())
    }

    /// Runs the full dialogue: `rounds` prompt/command round-trips, then
    /// one final prompt read for the response to the last command.
    pub fn run(&mut self) -> AppResult<ExchangeLog> {
        let mut log = ExchangeLog::default();

        for i in 0..self.rounds {
            log.prompts.push(self.read_prompt()?);
            self.send_command()?;
            log.commands_sent += 1;
            debug!("SENT_{}", i);
        }
        // The device answers the last command with one more prompt.
        log.prompts.push(self.read_prompt()?);

        Ok(log)
    }

    /// Releases the underlying transport.
    pub fn into_inner(self) -> T {
        self.io
    }
}
