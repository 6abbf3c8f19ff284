//! Message-passing plumbing between background tasks and the single owner of
//! their state.

mod runtime;
mod task;
mod updater;

pub use runtime::StateRuntime;
pub use task::TaskId;
pub use updater::LatestOnlyUpdater;
