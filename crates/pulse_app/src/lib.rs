//! The `pulse` command-line front end over the analysis engine.
pub mod platform;
