pub mod host;

pub use host::{RunResult, SessionHost};
