//! Foundation module - logging utilities shared across the crate

pub mod logging;
