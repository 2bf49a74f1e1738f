pub mod config;
pub mod platform;
pub mod session;
pub mod style;
pub mod testing;

pub use crate::config::JudgeConfig;
pub use crate::session::{JudgeSession, SessionError, SessionReport};
