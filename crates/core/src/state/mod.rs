pub mod run_state;
pub mod task;

pub use run_state::{ConceptSource, RunContext, RunSnapshot};
pub use task::{Task, TaskStatus};
