//! HOIL driver.
//!
//! Runs a program in two phases: build and resolve every `$instruct`
//! statement up front, then walk the program against a host. Nothing runs
//! if the build or the translation request fails.

pub mod config;
mod driver;
mod error;
mod logging;

pub use config::{RunConfig, TranslatorConfig, TranslatorKind};
pub use driver::{run_file, run_source, RunReport};
pub use error::HoilError;
pub use logging::init_tracing;
