//! Session planning and the run loop that drives each session to completion.
use std::fmt;
use std::io::Write;

use tracing::{debug, info};

use crate::alert::Alert;
use crate::config::{SessionKind, TimerConfig};
use crate::countdown::{Clock, Countdown};
use crate::error::{Result, TermdoroError};
use crate::gate::Confirm;
use crate::interrupt::Interrupt;

/// Bells rung at the end of every session.
const ALERT_TIMES: u32 = 2;

/// Where a session sits in the plan; decides its progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Break run before the first round.
    Opening,
    /// Work session of round `number` (1-based) out of `total`.
    Round { number: u64, total: u64 },
    /// Break between two rounds.
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub kind: SessionKind,
    pub seconds: u64,
    pub slot: Slot,
}

impl Session {
    /// Progress line printed before the session starts.
    pub fn heading(&self) -> String {
        match self.slot {
            Slot::Opening => format!("Ready to begin: {}", self.kind),
            Slot::Round { number, total } => format!("Round {number} of {total}: {}", self.kind),
            Slot::Between => format!("Next up: {}", self.kind),
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}s", self.kind, self.seconds)
    }
}

/// Ordered, immutable list of sessions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPlan {
    sessions: Vec<Session>,
}

impl SessionPlan {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn kinds(&self) -> Vec<SessionKind> {
        self.sessions.iter().map(|session| session.kind).collect()
    }
}

/// Lays out the sessions for `config`.
///
/// An opening break is added only when starting with a break of non-zero
/// length. Each round is a work session followed by a break, except the last
/// round, which has no trailing break. Breaks between rounds are kept even
/// when zero minutes long.
pub fn build_plan(config: &TimerConfig) -> SessionPlan {
    let mut sessions = Vec::new();

    if config.start_with == SessionKind::Break && config.break_minutes > 0 {
        sessions.push(Session {
            kind: SessionKind::Break,
            seconds: config.break_seconds(),
            slot: Slot::Opening,
        });
    }

    for i in 0..config.rounds {
        sessions.push(Session {
            kind: SessionKind::Work,
            seconds: config.work_seconds(),
            slot: Slot::Round {
                number: i + 1,
                total: config.rounds,
            },
        });
        if i + 1 < config.rounds {
            sessions.push(Session {
                kind: SessionKind::Break,
                seconds: config.break_seconds(),
                slot: Slot::Between,
            });
        }
    }

    debug!(sessions = sessions.len(), "built session plan");
    SessionPlan { sessions }
}

/// How a run ended, as seen by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Completed,
    Interrupted,
}

impl ExitStatus {
    pub const fn code(&self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Interrupted => 130,
        }
    }
}

pub struct Scheduler<W, C, G, A> {
    config: TimerConfig,
    out: W,
    countdown: Countdown<C>,
    gate: G,
    alert: A,
    interrupt: Interrupt,
}

impl<W, C, G, A> Scheduler<W, C, G, A>
where
    W: Write,
    C: Clock,
    G: Confirm,
    A: Alert,
{
    pub fn new(
        config: TimerConfig,
        out: W,
        clock: C,
        gate: G,
        alert: A,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            config,
            out,
            countdown: Countdown::new(clock),
            gate,
            alert,
            interrupt,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Runs every session in `plan` in order.
    ///
    /// An interrupt anywhere in the run is caught here: the notice is printed
    /// and `ExitStatus::Interrupted` returned. Other errors propagate.
    pub fn run(&mut self, plan: &SessionPlan) -> Result<ExitStatus> {
        match self.run_sessions(plan) {
            Ok(()) => {
                writeln!(self.out, "All rounds complete. Great job!")?;
                self.out.flush()?;
                info!(sessions = plan.len(), "all rounds complete");
                Ok(ExitStatus::Completed)
            }
            Err(TermdoroError::Interrupted) => {
                writeln!(self.out, "\nTimer interrupted. Exiting.")?;
                self.out.flush()?;
                info!("run interrupted");
                Ok(ExitStatus::Interrupted)
            }
            Err(err) => Err(err),
        }
    }

    fn run_sessions(&mut self, plan: &SessionPlan) -> Result<()> {
        for session in plan.iter() {
            self.interrupt.check()?;
            writeln!(self.out, "{}", session.heading())?;

            if !self.config.auto_advance {
                self.gate
                    .confirm(session.kind, &mut self.out, &self.interrupt)?;
            }

            info!(%session, "session started");
            self.countdown.run(
                &mut self.out,
                &self.interrupt,
                session.seconds,
                session.kind.label(),
            )?;
            writeln!(self.out, "{} session complete.", session.kind)?;
            self.out.flush()?;
            self.alert.alert(ALERT_TIMES, self.config.bell_enabled);
        }
        self.interrupt.check()
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
