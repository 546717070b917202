//! Confirmation gate shown before a session when auto-advance is off.
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;

use tracing::debug;

use crate::config::SessionKind;
use crate::countdown::POLL_INTERVAL;
use crate::error::Result;
use crate::interrupt::Interrupt;

/// Waits for the user to acknowledge the next session.
pub trait Confirm {
    fn confirm(
        &mut self,
        next: SessionKind,
        out: &mut dyn Write,
        interrupt: &Interrupt,
    ) -> Result<()>;
}

fn prompt(out: &mut dyn Write, next: SessionKind) -> io::Result<()> {
    write!(out, "Press Enter to start {next}...")?;
    out.flush()
}

/// No input is coming: proceed as if auto-advance were on.
fn resolve_eof(out: &mut dyn Write, next: SessionKind) -> Result<()> {
    debug!(%next, "end of input at gate, continuing");
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Gate reading lines synchronously from any buffered reader.
#[derive(Debug)]
pub struct LineGate<R> {
    input: R,
}

impl<R: BufRead> LineGate<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Confirm for LineGate<R> {
    fn confirm(
        &mut self,
        next: SessionKind,
        out: &mut dyn Write,
        interrupt: &Interrupt,
    ) -> Result<()> {
        interrupt.check()?;
        prompt(out, next)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        interrupt.check()?;

        if read == 0 {
            return resolve_eof(out, next);
        }
        debug!(%next, "gate acknowledged");
        Ok(())
    }
}

/// Gate on standard input. Lines come from a reader thread so that a Ctrl-C
/// arriving while the prompt is up is noticed within one poll interval.
#[derive(Debug, Default)]
pub struct StdinGate {
    lines: Option<Receiver<io::Result<usize>>>,
    eof: bool,
}

impl StdinGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate fed by an existing channel of `read_line` results instead of a
    /// stdin reader thread.
    pub fn from_lines(lines: Receiver<io::Result<usize>>) -> Self {
        Self {
            lines: Some(lines),
            eof: false,
        }
    }
}

fn spawn_stdin_reader() -> Receiver<io::Result<usize>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        loop {
            let mut line = String::new();
            let read = stdin.lock().read_line(&mut line);
            let done = !matches!(read, Ok(n) if n > 0);
            if tx.send(read).is_err() || done {
                break;
            }
        }
    });
    rx
}

impl Confirm for StdinGate {
    fn confirm(
        &mut self,
        next: SessionKind,
        out: &mut dyn Write,
        interrupt: &Interrupt,
    ) -> Result<()> {
        interrupt.check()?;
        prompt(out, next)?;
        if self.eof {
            return resolve_eof(out, next);
        }

        let lines = self.lines.get_or_insert_with(spawn_stdin_reader);
        loop {
            interrupt.check()?;
            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(read)) if read > 0 => {
                    debug!(%next, "gate acknowledged");
                    return Ok(());
                }
                Ok(Ok(_)) | Err(RecvTimeoutError::Disconnected) => {
                    self.eof = true;
                    return resolve_eof(out, next);
                }
                Ok(Err(err)) => {
                    self.eof = true;
                    return Err(err.into());
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}
