mod task;
pub mod text;

pub use task::{TaskId, TaskSeq, TaskState};
