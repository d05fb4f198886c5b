//! TaskMaster, a menu-driven personal task tracker
//!
//! - `task`: the task record and its line format
//! - `task_store`: the ordered task collection and its persistence
//! - `console`: prompts and feedback over any reader/writer pair
//! - `ui`: the interactive menu loop

pub mod config;
pub mod console;
pub mod error;
pub mod task;
pub mod task_store;
pub mod ui;

pub use error::{Error, ParseError};
pub type Result<T> = std::result::Result<T, Error>;
