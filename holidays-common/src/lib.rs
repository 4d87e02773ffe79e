pub mod error;
pub mod event;
pub mod frame;
pub mod holiday;
pub mod pipeline;
pub mod resource_manager;
pub mod state;
pub mod task;
