pub mod clone;
pub mod delete_attempts;

pub use clone::clone_command;
pub use delete_attempts::delete_attempts_command;
