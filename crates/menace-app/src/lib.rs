// Library root: configuration, dataset loading and the refreshable index
// store behind the `menace` binary.

pub mod cli;
pub mod config;
pub mod loader;
pub mod refresh;
