use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::sinks::Lossy;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use log::debug;
use std::cell::Cell;
use std::path::{Path, PathBuf};

fn literal_matcher(needle: &str) -> Option<RegexMatcher> {
    match RegexMatcherBuilder::new()
        .case_insensitive(true)
        .build_literals(&[needle])
    {
        Ok(matcher) => Some(matcher),
        Err(e) => {
            debug!("cannot build matcher for {}: {}", needle, e);
            None
        }
    }
}

/// Case-insensitive literal search, stopping at the first hit
pub(super) fn any_file_contains(files: &[PathBuf], needle: &str) -> bool {
    let Some(matcher) = literal_matcher(needle) else {
        return false;
    };
    files.iter().any(|path| file_contains(&matcher, path))
}

fn file_contains(matcher: &impl Matcher, path: &Path) -> bool {
    let found = Cell::new(false);

    let mut searcher = SearcherBuilder::new()
        .binary_detection(BinaryDetection::quit(b'\x00'))
        .line_number(true)
        .build();

    let result = searcher.search_path(
        matcher,
        path,
        Lossy(|_, _| {
            found.set(true);
            Ok(false)
        }),
    );

    match result {
        Ok(()) => found.get(),
        Err(e) => {
            debug!("error searching {}: {}", path.display(), e);
            false
        }
    }
}
