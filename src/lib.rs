//! A terminal Pomodoro timer: alternating work and break countdowns.

pub mod alert;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod error;
pub mod gate;
pub mod interrupt;
pub mod logging;
pub mod scheduler;

pub use error::{Result, TermdoroError};
