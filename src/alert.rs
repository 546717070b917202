//! Audible alert fired when a session ends.
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

/// Pause between consecutive bells.
pub const BELL_GAP: Duration = Duration::from_millis(50);

/// Fire-and-forget alert collaborator.
pub trait Alert {
    fn alert(&mut self, times: u32, enabled: bool);
}

/// Rings the terminal bell (`\x07`). Whether anything is heard depends on the
/// terminal's settings.
#[derive(Debug)]
pub struct TerminalBell<W> {
    out: W,
    gap: Duration,
}

impl TerminalBell<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), BELL_GAP)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, gap: Duration) -> Self {
        Self { out, gap }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Alert for TerminalBell<W> {
    fn alert(&mut self, times: u32, enabled: bool) {
        if !enabled {
            return;
        }
        for _ in 0..times {
            let _ = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
            if !self.gap.is_zero() {
                thread::sleep(self.gap);
            }
        }
    }
}
