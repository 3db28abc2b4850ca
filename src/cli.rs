//! Command-line interface

use crate::config::{ProbeKind, DEFAULT_OUTPUT, DEFAULT_PATHSPEC, DEFAULT_SYSTEMD_REPO};
use clap::Parser;
use std::path::PathBuf;

/// Generate the systemd feature comparison table for rustysd
#[derive(Debug, Parser)]
#[command(name = "featcmp", version, about)]
pub struct Cli {
    /// Root of the systemd source checkout (man pages are read from <DIR>/man)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SYSTEMD_REPO)]
    pub systemd_repo: PathBuf,

    /// Where to write the markdown report
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Implementation checkout searched for unregistered terms
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub impl_root: PathBuf,

    /// How unregistered terms are looked up in the implementation
    #[arg(long, value_enum, default_value_t = ProbeKind::Git)]
    pub probe: ProbeKind,

    /// Files searched by the probe, relative to the implementation root
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_PATHSPEC)]
    pub pathspec: String,

    /// JSON registry replacing the built-in support table
    #[arg(long, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Exit with status 2 if the registry drifted from the man pages
    #[arg(long)]
    pub deny_drift: bool,

    /// Log probe decisions and per-term details
    #[arg(short, long)]
    pub verbose: bool,
}
