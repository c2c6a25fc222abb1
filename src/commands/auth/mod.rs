pub mod add;
pub mod remove;
pub mod select;
pub mod status;

pub use add::add_command;
pub use remove::remove_command;
pub use select::{list_command, select_command};
pub use status::status_command;
