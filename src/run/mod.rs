//! Tool entry points.
//!
//! Each tool takes the immutable [`Settings`](crate::Settings) by reference
//! and returns a structured result; `main` only formats it.

mod check;
mod scheduled;
mod suggest;

pub use check::{run_check, CheckRun};
pub use scheduled::{run_scheduled, ScheduledOutcome};
pub use suggest::{run_suggest, SuggestRun};
