//! Library half of the `combviz` binary: input formats, loaders and the
//! subcommand bodies, kept here so they can be tested without a process.

pub mod error;
pub mod input;
pub mod run;
