//! User session store.
//!
//! Keeps the signed-in user's profile in sync with the access token:
//! a token arriving triggers a profile fetch, a token going away (or a
//! failed fetch) runs the logout procedure.
//!
//! - `state`: session state and derived status
//! - `events` / `effects`: reducer inputs and outputs
//! - `reducer`: the pure transition function
//! - `runtime`: effect execution and the event inbox

mod effects;
mod events;
mod reducer;
mod runtime;
mod state;

pub use effects::SessionEffect;
pub use events::{FetchFailure, SessionEvent};
pub use reducer::update;
pub use runtime::{SessionHandle, SessionRuntime};
pub use state::{LOGGED_OUT_MESSAGE, Route, SessionState, SessionStatus};
