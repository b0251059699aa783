//! Application services for task storage.

mod registry;

pub use registry::{
    CreateTaskRequest, TaskService, TaskServiceError, TaskServiceResult, UpdateTaskRequest,
};
