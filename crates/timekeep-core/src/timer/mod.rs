mod engine;
mod preset;
mod session;

pub use engine::{Countdown, Phase, Tick};
pub use preset::{Durations, Preset};
pub use session::{CountdownSession, CountdownSnapshot, TickStream};
