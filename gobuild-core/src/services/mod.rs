//! Ambient services

pub mod logging;
