//! One complete run: scan the pages, write the report

use crate::config::Config;
use crate::error::{FeatCmpError, Result};
use crate::report::{ManDirectory, Report, ReportBuilder};
use log::{debug, info};

/// Build the report described by `config` and write it to `config.output`
pub fn generate(config: &Config) -> Result<Report> {
    let registry = config.load_registry()?;
    debug!(
        "registry has {} entries: {:?}",
        registry.len(),
        registry.summary()
    );

    let probe = config.build_probe()?;
    let source = ManDirectory::new(config.man_dir());
    info!(
        "scanning {} pages in {} with the {} probe",
        config.pages.len(),
        source.dir().display(),
        probe.name()
    );

    let builder = ReportBuilder::new(&registry, probe.as_ref(), &config.links);
    let report = builder.build(&source, &config.pages)?;

    std::fs::write(&config.output, report.to_markdown()).map_err(|source| {
        FeatCmpError::WriteReport {
            path: config.output.clone(),
            source,
        }
    })?;
    info!("wrote {}: {}", config.output.display(), report.summary());

    Ok(report)
}
