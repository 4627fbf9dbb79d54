//! Clock and sleeper abstractions
//!
//! Production code uses [`SystemClock`] and [`TokioSleeper`]; tests swap in
//! the doubles from `testing`.

pub mod clock;
pub mod sleeper;

pub use clock::{Clock, SystemClock};
pub use sleeper::{SleepOutcome, Sleeper, TokioSleeper};
