//! Open editor tabs presented as a folder tree.

pub mod commands;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod host;
pub mod logging;
pub mod session;
pub mod sync;
pub mod tree;
pub mod view;
