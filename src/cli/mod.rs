//! Command-line front end

pub mod commands;
pub mod render;
pub mod repl;
