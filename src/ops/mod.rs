pub mod auth_ops;
pub mod cache;
pub mod contact_ops;
pub mod identity;
pub mod keys;
pub mod search;
pub mod store;
pub mod subtask_editor;
pub mod summary;
pub mod task_ops;
pub mod validate;
