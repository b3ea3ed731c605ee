//! Tasks with time estimates.
//!
//! Tasks are created with an estimate and a category, accumulate worked
//! minutes from focus sessions, and are toggled done when finished.

pub mod repository;
pub mod storage;
pub mod task;

pub use repository::TaskRepository;
pub use storage::TaskStore;
pub use task::{NewTask, Task, TaskQuery, TaskStatus, SHORT_ID_LEN};

#[cfg(test)]
pub use repository::MockTaskRepository;
