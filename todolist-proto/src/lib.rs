//! Shared task model and storage format for `todolist`.

pub mod codec;
pub mod task;
