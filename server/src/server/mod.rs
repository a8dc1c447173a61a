//! The websocket front end: connection registry, command dispatch and the
//! single-writer manager actor.

pub mod actor;
pub mod run;
pub mod state;
pub mod ws;

pub use actor::{spawn_manager, Action, ManagerRequest, Outcome};
pub use run::{build_router, run_server};
pub use state::AppState;
