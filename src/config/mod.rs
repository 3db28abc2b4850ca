//! Run configuration
//!
//! Everything a feature comparison run needs, gathered in one place:
//! - where the systemd man pages live (`<systemd-repo>/man/<page>.xml`)
//! - where the report goes
//! - how unregistered terms are probed in the implementation tree
//! - how links in the report are built
//!
//! Defaults reproduce a plain `featcmp` run from the rustysd checkout with the
//! systemd sources next to it. `FEATCMP_LOG` overrides the log level.

pub mod links;

use crate::cli::Cli;
use crate::error::Result;
#[cfg(feature = "git-probe")]
use crate::probe::GitIndexProbe;
use crate::probe::{GitGrepProbe, NoProbe, PresenceProbe, SourceTreeProbe};
use crate::registry::FeatureRegistry;
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

pub use links::LinkConfig;

/// Man pages scanned in every run, in report order
pub const RELEVANT_PAGES: &[&str] = &[
    "sd_notify",
    "systemd.exec",
    "systemd.kill",
    "systemd.path",
    "systemd.resource-control",
    "systemd.service",
    "systemd.socket",
    "systemd.timer",
    "systemd.unit",
];

pub const DEFAULT_SYSTEMD_REPO: &str = "../systemd";
pub const DEFAULT_OUTPUT: &str = "feature-comparison.md";
pub const DEFAULT_PATHSPEC: &str = "src/*.rs";

/// Environment variable overriding the log level
pub const LOG_ENV: &str = "FEATCMP_LOG";

/// How terms missing from the registry are looked up in the implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ProbeKind {
    /// Run `git grep` in the implementation checkout
    #[default]
    Git,
    /// Search tracked files in-process via libgit2
    Index,
    /// Search every matching file below the implementation root
    Tree,
    /// Never probe; unregistered terms are reported as absent
    None,
}

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the systemd source checkout
    pub systemd_repo: PathBuf,
    /// Markdown report destination
    pub output: PathBuf,
    /// Root of the implementation checkout searched by probes
    pub impl_root: PathBuf,
    pub probe: ProbeKind,
    /// Files searched by probes, relative to `impl_root`
    pub pathspec: String,
    /// Registry JSON replacing the built-in table
    pub registry: Option<PathBuf>,
    pub links: LinkConfig,
    /// Exit non-zero when any drift diagnostic was raised
    pub deny_drift: bool,
    pub log_level: LevelFilter,
    pub pages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            systemd_repo: PathBuf::from(DEFAULT_SYSTEMD_REPO),
            output: PathBuf::from(DEFAULT_OUTPUT),
            impl_root: PathBuf::from("."),
            probe: ProbeKind::default(),
            pathspec: DEFAULT_PATHSPEC.to_string(),
            registry: None,
            links: LinkConfig::default(),
            deny_drift: false,
            log_level: LevelFilter::Info,
            pages: RELEVANT_PAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let default_level = if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        Self {
            systemd_repo: cli.systemd_repo.clone(),
            output: cli.output.clone(),
            impl_root: cli.impl_root.clone(),
            probe: cli.probe,
            pathspec: cli.pathspec.clone(),
            registry: cli.registry.clone(),
            deny_drift: cli.deny_drift,
            log_level: log_level_from_env(default_level),
            ..Self::default()
        }
    }

    /// Directory holding the DocBook sources of the man pages
    pub fn man_dir(&self) -> PathBuf {
        self.systemd_repo.join("man")
    }

    /// The registry file if one was given, the built-in table otherwise
    pub fn load_registry(&self) -> Result<FeatureRegistry> {
        match &self.registry {
            Some(path) => FeatureRegistry::from_path(path),
            None => Ok(FeatureRegistry::builtin()),
        }
    }

    pub fn build_probe(&self) -> Result<Box<dyn PresenceProbe>> {
        let probe: Box<dyn PresenceProbe> = match self.probe {
            ProbeKind::Git => Box::new(GitGrepProbe::new(&self.impl_root, &self.pathspec)),
            #[cfg(feature = "git-probe")]
            ProbeKind::Index => Box::new(GitIndexProbe::new(&self.impl_root, &self.pathspec)?),
            #[cfg(not(feature = "git-probe"))]
            ProbeKind::Index => {
                return Err(crate::error::FeatCmpError::ProbeSetup(
                    "built without the git-probe feature".to_string(),
                ))
            }
            ProbeKind::Tree => Box::new(SourceTreeProbe::new(&self.impl_root, &self.pathspec)?),
            ProbeKind::None => Box::new(NoProbe),
        };
        Ok(probe)
    }
}

/// Level from `FEATCMP_LOG`, falling back to `default` when unset or invalid
pub fn log_level_from_env(default: LevelFilter) -> LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|val| val.trim().parse::<LevelFilter>().ok())
        .unwrap_or(default)
}
