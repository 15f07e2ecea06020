//! # Chronicle Demo
//!
//! The presentation side of EVE Chronicle: a stack of screens (instructions,
//! main menu, dialogue) driven by abstract [`Input`] events, producing a
//! [`View`] any front end can display. The `chronicle` binary is a
//! line-oriented terminal front end over [`DemoSession`].

pub mod config;
pub mod screen;
pub mod session;

pub use config::*;
pub use screen::*;
pub use session::*;
