pub mod replacements;
pub mod usage;

pub use replacements::replacements_command;
pub use usage::usage_command;
