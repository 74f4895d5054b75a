//! Command-line surface.

mod opts;

pub use opts::Cli;
