//! Command handlers, one module per command group.

pub mod auth;
pub mod captions;
pub mod categories;
pub mod channels;
pub mod chapters;
pub mod cuepoints;
pub mod entries;
pub mod flavors;
pub mod playlists;
pub mod quizzes;
pub mod reports;
pub mod retention;
