//! Countdown engine: draws a live `LABEL: MM:SS` line until the time is up.
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::Result;
use crate::interrupt::Interrupt;

/// How often the clock is sampled while counting down.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Monotonic time source. Swappable so the engine can run without real sleeps.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Formats seconds as zero-padded `MM:SS`. Minutes never wrap into hours and
/// negative input shows as `00:00`.
pub fn format_mmss(seconds: i64) -> String {
    format_remaining(seconds.max(0).unsigned_abs())
}

fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// State for a single countdown, dropped when it finishes.
#[derive(Debug)]
struct CountdownState {
    start: Instant,
    /// `None` when the end lies past what `Instant` can represent.
    end: Option<Instant>,
    duration: Duration,
    last_shown: Option<u64>,
}

impl CountdownState {
    fn begin(now: Instant, duration: Duration) -> Self {
        Self {
            start: now,
            end: now.checked_add(duration),
            duration,
            last_shown: None,
        }
    }

    /// Whole seconds left, rounded down.
    fn remaining(&self, now: Instant) -> u64 {
        let left = match self.end {
            Some(end) => end.saturating_duration_since(now),
            None => self
                .duration
                .saturating_sub(now.saturating_duration_since(self.start)),
        };
        left.as_secs()
    }

    /// Records `remaining` as shown; false when it matches the previous draw.
    fn should_draw(&mut self, remaining: u64) -> bool {
        if self.last_shown == Some(remaining) {
            return false;
        }
        self.last_shown = Some(remaining);
        true
    }
}

#[derive(Debug, Clone)]
pub struct Countdown<C> {
    clock: C,
    poll_interval: Duration,
}

impl<C: Clock> Countdown<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Counts down `seconds`, redrawing `out` in place whenever the displayed
    /// value changes. The line is always finished with a newline, including
    /// when an interrupt cuts the countdown short; the interrupt is returned
    /// afterwards.
    pub fn run<W: Write + ?Sized>(
        &self,
        out: &mut W,
        interrupt: &Interrupt,
        seconds: u64,
        label: &str,
    ) -> Result<()> {
        let mut state = CountdownState::begin(self.clock.now(), Duration::from_secs(seconds));
        debug!(label, seconds, "countdown started");

        let outcome = self.tick_until_done(out, interrupt, &mut state, label);
        let finalized = writeln!(out).and_then(|()| out.flush());

        let elapsed = self.clock.now().saturating_duration_since(state.start);
        debug!(label, elapsed_ms = elapsed.as_millis() as u64, ok = outcome.is_ok(), "countdown finished");

        outcome?;
        finalized?;
        Ok(())
    }

    fn tick_until_done<W: Write + ?Sized>(
        &self,
        out: &mut W,
        interrupt: &Interrupt,
        state: &mut CountdownState,
        label: &str,
    ) -> Result<()> {
        loop {
            interrupt.check()?;

            let remaining = state.remaining(self.clock.now());
            if state.should_draw(remaining) {
                write!(out, "\r{}: {}", label, format_remaining(remaining))?;
                out.flush()?;
            }
            if remaining == 0 {
                return Ok(());
            }

            self.clock.sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::TermdoroError;
    use std::cell::Cell;

    /// Clock that advances only when slept on, optionally raising an
    /// interrupt after a number of sleeps.
    pub(crate) struct ManualClock {
        now: Cell<Instant>,
        sleeps: Cell<u32>,
        interrupt_after: Option<(u32, Interrupt)>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Cell::new(Instant::now()),
                sleeps: Cell::new(0),
                interrupt_after: None,
            }
        }

        pub(crate) fn interrupting_after(sleeps: u32, interrupt: Interrupt) -> Self {
            Self {
                interrupt_after: Some((sleeps, interrupt)),
                ..Self::new()
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now.get()
        }

        fn sleep(&self, duration: Duration) {
            self.now.set(self.now.get() + duration);
            self.sleeps.set(self.sleeps.get() + 1);
            if let Some((after, interrupt)) = &self.interrupt_after {
                if self.sleeps.get() >= *after {
                    interrupt.trigger();
                }
            }
        }
    }

    /// Values drawn on the countdown line, in order.
    fn drawn_values(output: &str, label: &str) -> Vec<u64> {
        let prefix = format!("{label}: ");
        output
            .split(['\r', '\n'])
            .filter_map(|part| part.strip_prefix(&prefix))
            .map(|mmss| {
                let (m, s) = mmss.split_once(':').unwrap();
                m.parse::<u64>().unwrap() * 60 + s.parse::<u64>().unwrap()
            })
            .collect()
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(65), "01:05");
        assert_eq!(format_mmss(7500), "125:00");
        assert_eq!(format_mmss(-30), "00:00");
    }

    #[test]
    fn test_countdown_draws_each_second_once() {
        let clock = ManualClock::new();
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        countdown.run(&mut out, &Interrupt::new(), 3, "WORK").unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(drawn_values(&output, "WORK"), vec![3, 2, 1, 0]);
        assert!(output.starts_with("\rWORK: 00:03"));
        assert!(output.ends_with("\rWORK: 00:00\n"));
    }

    #[test]
    fn test_countdown_values_are_monotonic() {
        let clock = ManualClock::new();
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        countdown.run(&mut out, &Interrupt::new(), 90, "BREAK").unwrap();

        let values = drawn_values(&String::from_utf8(out).unwrap(), "BREAK");
        assert!(values[0] <= 90);
        assert_eq!(values.last(), Some(&0));
        assert!(values.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let clock = ManualClock::new();
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        countdown.run(&mut out, &Interrupt::new(), 0, "BREAK").unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\rBREAK: 00:00\n");
        assert_eq!(clock.sleeps.get(), 0);
    }

    #[test]
    fn test_interrupt_finalizes_line_once() {
        let interrupt = Interrupt::new();
        let clock = ManualClock::interrupting_after(15, interrupt.clone());
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        let result = countdown.run(&mut out, &interrupt, 60, "WORK");

        assert!(matches!(result, Err(TermdoroError::Interrupted)));
        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches('\n').count(), 1);
        assert!(output.ends_with('\n'));
        assert_eq!(drawn_values(&output, "WORK"), vec![60, 59, 58]);
    }

    #[test]
    fn test_interrupt_on_second_boundary() {
        let interrupt = Interrupt::new();
        let clock = ManualClock::interrupting_after(10, interrupt.clone());
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        let result = countdown.run(&mut out, &interrupt, 60, "WORK");

        assert!(matches!(result, Err(TermdoroError::Interrupted)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\rWORK: 01:00\rWORK: 00:59\n"
        );
    }

    #[test]
    fn test_huge_duration_does_not_overflow() {
        let interrupt = Interrupt::new();
        let clock = ManualClock::interrupting_after(1, interrupt.clone());
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        let result = countdown.run(&mut out, &interrupt, u64::MAX, "WORK");

        assert!(matches!(result, Err(TermdoroError::Interrupted)));
        let values = drawn_values(&String::from_utf8(out).unwrap(), "WORK");
        assert_eq!(values, vec![u64::MAX]);
    }

    #[test]
    fn test_remaining_past_representable_end() {
        let start = Instant::now();
        let state = CountdownState::begin(start, Duration::from_secs(u64::MAX));

        assert_eq!(state.remaining(start), u64::MAX);
        assert_eq!(state.remaining(start + Duration::from_millis(1500)), u64::MAX - 2);
    }

    #[test]
    fn test_natural_expiry_finalizes_line_once() {
        let clock = ManualClock::new();
        let countdown = Countdown::new(&clock);
        let mut out: Vec<u8> = Vec::new();

        countdown.run(&mut out, &Interrupt::new(), 2, "WORK").unwrap();

        assert_eq!(String::from_utf8(out).unwrap().matches('\n').count(), 1);
    }
}
