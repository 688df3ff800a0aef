//! Command-line front end for the sage research agent.

/// Argument parsing.
pub mod cli;
/// Run wiring and logging setup.
pub mod handlers;
/// Goal selection when none is given on the command line.
pub mod interactive;
/// Report rendering.
pub mod output;
