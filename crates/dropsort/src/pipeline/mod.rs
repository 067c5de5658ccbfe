pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;

pub use config::PipelineConfig;
pub use context::{FileJob, PipelineContext};
pub use error::PipelineError;
pub use progress::{ActivityObserver, BroadcastObserver, NoopObserver, PipelineEvent};
pub use runner::{Organizer, Outcome, SkipReason, CONCURRENT_DUPLICATE_REASON};
