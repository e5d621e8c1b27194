//! Host-side glue
//!
//! - [`runtime`]: message queue and update loop around a lazy loader
//! - [`app_runner`]: terminal and headless front ends for the demo modules

pub mod app_runner;
pub mod runtime;
