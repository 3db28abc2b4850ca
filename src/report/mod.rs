//! Feature comparison report
//!
//! Joins the terms extracted from each man page against the feature registry
//! and collects one row per term occurrence, grouped by page. Terms missing
//! from the registry are classified with the presence probe. After the last
//! page every registry entry that matched nothing is reported as drift.

mod render;
mod source;

use crate::config::LinkConfig;
use crate::error::{FeatCmpError, Result};
use crate::extract::Term;
use crate::probe::PresenceProbe;
use crate::registry::{FeatureRegistry, SupportStatus, UsageTracker};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

pub use render::to_markdown;
pub use source::{ManDirectory, PageSource};

/// Minimum similarity for a drift suggestion
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// One term occurrence in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub page: String,
    /// Term as written in the man page
    pub display_term: String,
    /// Normalized lookup key
    pub key: String,
    pub status: SupportStatus,
    pub note: String,
    pub docs_link: String,
    pub search_link: String,
}

impl ReportRow {
    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }
}

/// Rows of one man page in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub page: String,
    pub rows: Vec<ReportRow>,
}

/// Advisory findings; they never change the rows or fail the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The implementation mentions a term the registry does not know
    Unregistered { key: String, page: String },
    /// A registry entry matched no term in any scanned page
    UnusedEntry {
        key: String,
        suggestion: Option<String>,
    },
}

impl Diagnostic {
    pub fn key(&self) -> &str {
        match self {
            Diagnostic::Unregistered { key, .. } | Diagnostic::UnusedEntry { key, .. } => key,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Unregistered { key, page } => write!(
                f,
                "{} ({}) is found in the implementation but missing from the registry",
                key, page
            ),
            Diagnostic::UnusedEntry {
                key,
                suggestion: Some(suggestion),
            } => write!(
                f,
                "registry entry {} matches no term in the scanned pages (renamed to {}?)",
                key, suggestion
            ),
            Diagnostic::UnusedEntry {
                key,
                suggestion: None,
            } => write!(
                f,
                "registry entry {} matches no term in the scanned pages",
                key
            ),
        }
    }
}

/// Counts per status over the whole report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub by_status: BTreeMap<SupportStatus, usize>,
    /// Row count per page, in report order
    pub by_page: Vec<(String, usize)>,
}

impl ReportSummary {
    pub fn count(&self, status: SupportStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} terms", self.total)?;
        for status in SupportStatus::ALL {
            write!(f, ", {} {}", self.count(status), status)?;
        }
        Ok(())
    }
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct Report {
    pub pages: Vec<PageReport>,
    pub diagnostics: Vec<Diagnostic>,
    /// Registry keys matched during the run
    pub usage: UsageTracker,
}

impl Report {
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }

    pub fn page(&self, name: &str) -> Option<&PageReport> {
        self.pages.iter().find(|p| p.page == name)
    }

    pub fn has_drift(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn unused_entries(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnusedEntry { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }

    pub fn summary(&self) -> ReportSummary {
        let mut by_status = BTreeMap::new();
        for row in self.rows() {
            *by_status.entry(row.status).or_insert(0) += 1;
        }
        ReportSummary {
            total: self.rows().count(),
            by_status,
            by_page: self
                .pages
                .iter()
                .map(|p| (p.page.clone(), p.rows.len()))
                .collect(),
        }
    }

    pub fn to_markdown(&self) -> String {
        render::to_markdown(self)
    }
}

/// Builds a [`Report`] from a registry and a presence probe
pub struct ReportBuilder<'a> {
    registry: &'a FeatureRegistry,
    probe: &'a dyn PresenceProbe,
    links: &'a LinkConfig,
}

/// Per-run state
struct RunState {
    usage: UsageTracker,
    probed: HashMap<String, bool>,
    unregistered: BTreeSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        registry: &'a FeatureRegistry,
        probe: &'a dyn PresenceProbe,
        links: &'a LinkConfig,
    ) -> Self {
        Self {
            registry,
            probe,
            links,
        }
    }

    /// Scan `pages` in order and classify every term
    ///
    /// Fails on the first page that cannot be loaded or parsed.
    pub fn build<S: AsRef<str>>(&self, source: &dyn PageSource, pages: &[S]) -> Result<Report> {
        let mut state = RunState {
            usage: UsageTracker::new(),
            probed: HashMap::new(),
            unregistered: BTreeSet::new(),
            diagnostics: Vec::new(),
        };

        let mut reports = Vec::with_capacity(pages.len());
        for page in pages {
            let page = page.as_ref();
            let document = source.load(page)?;

            let mut rows = Vec::new();
            for term in document.terms() {
                let term = term.map_err(|source| FeatCmpError::MalformedPage {
                    page: page.to_string(),
                    source,
                })?;
                rows.push(self.classify(page, &term, &mut state));
            }
            info!("{}: {} terms", page, rows.len());
            reports.push(PageReport {
                page: page.to_string(),
                rows,
            });
        }

        for (key, _) in state.usage.unused(self.registry) {
            let diagnostic = Diagnostic::UnusedEntry {
                key: key.to_string(),
                suggestion: closest_match(key, &state.unregistered),
            };
            warn!("{}", diagnostic);
            state.diagnostics.push(diagnostic);
        }

        Ok(Report {
            pages: reports,
            diagnostics: state.diagnostics,
            usage: state.usage,
        })
    }

    fn classify(&self, page: &str, term: &Term, state: &mut RunState) -> ReportRow {
        let key = term.key();

        let (status, note) = match self.registry.status_of(key) {
            Some(record) => {
                state.usage.mark_used(key);
                (record.status, record.note.clone())
            }
            None => {
                state.unregistered.insert(key.to_string());
                (self.probe_status(page, key, state), String::new())
            }
        };

        ReportRow {
            page: page.to_string(),
            display_term: term.as_str().to_string(),
            key: key.to_string(),
            status,
            note,
            docs_link: self.links.docs_link(page, term.as_str()),
            search_link: self.links.search_link(key),
        }
    }

    fn probe_status(&self, page: &str, key: &str, state: &mut RunState) -> SupportStatus {
        // An empty key would match any empty string literal.
        if key.is_empty() {
            return SupportStatus::Absent;
        }

        let present = match state.probed.get(key) {
            Some(&present) => present,
            None => {
                let present = self.probe.probe(key);
                debug!("{} probe for {}: {}", self.probe.name(), key, present);
                state.probed.insert(key.to_string(), present);
                if present {
                    let diagnostic = Diagnostic::Unregistered {
                        key: key.to_string(),
                        page: page.to_string(),
                    };
                    warn!("{}", diagnostic);
                    state.diagnostics.push(diagnostic);
                }
                present
            }
        };

        if present {
            SupportStatus::Unknown
        } else {
            SupportStatus::Absent
        }
    }
}

/// Most similar candidate above the suggestion threshold
fn closest_match(key: &str, candidates: &BTreeSet<String>) -> Option<String> {
    let mut best: Option<(f64, &String)> = None;
    for candidate in candidates {
        let score = strsim::jaro_winkler(key, candidate);
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, candidate)| candidate.clone())
}
