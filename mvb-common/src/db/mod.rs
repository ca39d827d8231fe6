//! Database models and queries

pub mod init;
pub mod models;
pub mod movies;
pub mod users;
pub mod watch_history;

pub use init::*;
pub use models::*;
