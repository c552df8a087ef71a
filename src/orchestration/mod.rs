pub mod publisher;
pub mod state;

pub use publisher::{PublishOrchestrator, PublishReport, UploadedFile};
pub use state::{PublishState, StateTracker, StateTransition};
