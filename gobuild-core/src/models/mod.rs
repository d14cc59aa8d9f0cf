//! Data models for gobuild

pub mod command;
pub mod configuration;

pub use command::*;
pub use configuration::*;
