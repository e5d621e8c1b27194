//! Core Elm Architecture implementation
//!
//! This module contains the pieces the lazy loader is built from:
//! - Host state, messages and the update function
//! - Actions and the dispatch handle views call them through
//! - Module descriptors, providers and the bundle registry
//! - Commands produced by update and executed by the runtime

pub mod action;
pub mod bundle;
pub mod cmd;
pub mod dispatch;
pub mod error;
pub mod msg;
pub mod registry;
pub mod state;
pub mod update;
