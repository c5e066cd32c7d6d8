//! Shared wire types and error hierarchy for tether.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

pub use error::{ApiError, ConfigError, TetherError, ToolError};
pub use message::*;
pub use provider::Provider;
pub use tool::{ToolDescriptor, ToolDispatcher};
