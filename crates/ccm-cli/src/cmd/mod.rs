pub mod config;
pub mod copy;
pub mod hook_id;
pub mod projects;
pub mod records;
