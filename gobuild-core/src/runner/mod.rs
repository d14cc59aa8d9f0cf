//! Asynchronous process execution

pub mod process;
pub mod worker;

pub use process::*;
pub use worker::*;
