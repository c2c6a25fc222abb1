pub mod download;
pub mod set_visibility;

pub use download::download_command;
pub use set_visibility::set_visibility_command;
