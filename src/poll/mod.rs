pub mod controller;
pub mod loop_worker;

pub use controller::PollController;
pub use loop_worker::{Clock, CycleOutcome, PollLoop, PollPhase, StatusSnapshot};
