//! Query orchestration for tether.

mod orchestrator;

pub use orchestrator::{Orchestrator, QueryEvent};
