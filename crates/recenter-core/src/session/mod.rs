mod model;
mod store;
mod tracker;

pub use model::{FocusSession, SessionStatus, StartSession};
pub use store::SessionStore;
pub use tracker::{SessionTracker, TrackerConfig, TrackerState};
