pub mod envelope;
pub mod game;
pub mod time;
pub mod types;

pub use envelope::CommandEnvelope;
pub use game::{Game, TerminalOutcome};
pub use time::Millis;
pub use types::Tick;
