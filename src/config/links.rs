//! Deep links rendered into the report

use url::form_urlencoded;

pub const DEFAULT_MAN_BASE_URL: &str = "https://www.freedesktop.org/software/systemd/man";
pub const DEFAULT_CODE_REPO: &str = "KillingSpark/rustysd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Base of the published man pages; pages live at `<base>/<page>.html`
    pub man_base_url: String,
    /// `owner/name` of the implementation on GitHub
    pub code_repo: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            man_base_url: DEFAULT_MAN_BASE_URL.to_string(),
            code_repo: DEFAULT_CODE_REPO.to_string(),
        }
    }
}

impl LinkConfig {
    /// Anchor of the term on the published man page
    pub fn docs_link(&self, page: &str, term: &str) -> String {
        format!(
            "{}/{}.html#{}",
            self.man_base_url.trim_end_matches('/'),
            page,
            term
        )
    }

    /// GitHub code search for the normalized term in the implementation
    pub fn search_link(&self, key: &str) -> String {
        let query = format!("'{}' repo:{} language:Rust", key, self.code_repo);
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("https://github.com/search?q={}&type=Code", encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_link() {
        let links = LinkConfig::default();
        assert_eq!(
            links.docs_link("systemd.service", "ExecStart="),
            "https://www.freedesktop.org/software/systemd/man/systemd.service.html#ExecStart="
        );
    }

    #[test]
    fn test_search_link_encoding() {
        let links = LinkConfig::default();
        assert_eq!(
            links.search_link("ExecStart"),
            "https://github.com/search?q=%27ExecStart%27+repo%3AKillingSpark%2Frustysd+language%3ARust&type=Code"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let links = LinkConfig {
            man_base_url: "https://example.org/man/".to_string(),
            ..LinkConfig::default()
        };
        assert_eq!(
            links.docs_link("sd_notify", "READY=1"),
            "https://example.org/man/sd_notify.html#READY=1"
        );
    }
}
