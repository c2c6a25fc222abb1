pub mod delete;
pub mod download;
pub mod duplicate;
pub mod rename;

pub use delete::delete_command;
pub use download::download_command;
pub use duplicate::duplicate_command;
pub use rename::rename_command;
