pub mod errors;
pub mod events;
pub mod session;
pub mod tick_loop;
pub mod types;

pub use errors::SubmitError;
pub use events::EventBuffer;
pub use session::SessionHandle;
pub use tick_loop::{run_session_loop, spawn_session_loop};
pub use types::{EventCursor, RuntimeConfig, RuntimeEvent, SessionStatus};
