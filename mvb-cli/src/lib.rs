//! # MVB Terminal Front-End
//!
//! - [`catalog`]: seeds an empty database from the catalog CSV
//! - [`prompt`]: line-oriented input helpers over any reader/writer pair
//! - [`menu`]: user, main and movie-selection menus

pub mod catalog;
pub mod menu;
pub mod prompt;

pub use menu::Session;
pub use prompt::Prompt;
