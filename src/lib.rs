// Library interface for featcmp
// The binary is a thin wrapper; tests drive the pipeline through these modules.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod logging;
pub mod probe;
pub mod registry;
pub mod report;

pub use config::Config;
pub use error::{FeatCmpError, Result};
pub use generate::generate;
pub use report::{Diagnostic, Report, ReportBuilder, ReportRow};
