// State management module.
// Holds the search session state machine and its event types.

pub mod session;

pub use session::{Session, SessionEvent, SessionState, run_session};
