//! Term extraction from DocBook man-page sources
//!
//! Walks a man-page XML document and yields the configuration option names
//! found in definition-list `<term>` nodes, in document order.
//!
//! A term node contributes the text of its first direct `<varname>` child if it
//! has one, otherwise its own leading text. Empty and whitespace-only terms are
//! skipped. The sequence is lazy and can be restarted by calling
//! [`Document::terms`] again.

mod entities;

use crate::error::ExtractError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::fmt;

pub use entities::decode_entities;

/// Strip the value placeholder and the `$` sigil from a term.
///
/// `ExecStart=` becomes `ExecStart`, `$NOTIFY_SOCKET` becomes `NOTIFY_SOCKET`.
/// Applying it twice gives the same result as applying it once.
pub fn normalize(term: &str) -> &str {
    let head = term.split_once('=').map_or(term, |(head, _)| head);
    head.trim_start_matches('$')
}

/// A raw term as written in the man page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    raw: String,
}

impl Term {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Display form, verbatim from the document
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized lookup key
    pub fn key(&self) -> &str {
        normalize(&self.raw)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Which elements count as terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSelector {
    /// Element holding a definition-list term
    pub element: &'static str,
    /// Direct child whose text wins over the term's own text
    pub preferred_child: &'static str,
}

impl Default for TermSelector {
    fn default() -> Self {
        Self {
            element: "term",
            preferred_child: "varname",
        }
    }
}

/// An in-memory man-page source
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
}

impl Document {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Terms selected by `<term>`/`<varname>`
    pub fn terms(&self) -> Terms<'_> {
        self.terms_matching(TermSelector::default())
    }

    pub fn terms_matching(&self, selector: TermSelector) -> Terms<'_> {
        Terms::new(&self.source, selector)
    }
}

enum FrameKind {
    Term {
        slot: usize,
        text: String,
        leading: bool,
        child_text: Option<String>,
    },
    PreferredChild {
        capture: bool,
        text: String,
        leading: bool,
    },
    Other,
}

struct Frame {
    name: String,
    kind: FrameKind,
}

/// Lazy iterator over the terms of a [`Document`]
///
/// Terms are yielded in the order their opening tags appear. After the first
/// error the iterator is exhausted.
pub struct Terms<'a> {
    reader: Reader<&'a [u8]>,
    selector: TermSelector,
    stack: Vec<Frame>,
    // Slots for terms whose opening tag has been seen; `None` until closed,
    // `Some(None)` when the term turned out to be empty.
    pending: VecDeque<Option<Option<String>>>,
    emitted: usize,
    done: bool,
}

impl<'a> Terms<'a> {
    fn new(source: &'a str, selector: TermSelector) -> Self {
        Self {
            reader: Reader::from_str(source),
            selector,
            stack: Vec::new(),
            pending: VecDeque::new(),
            emitted: 0,
            done: false,
        }
    }

    fn error(&mut self, message: impl Into<String>) -> ExtractError {
        self.done = true;
        ExtractError::new(self.reader.error_position(), message)
    }

    fn open(&mut self, start: &BytesStart<'_>) {
        let local = start.local_name();
        let name = String::from_utf8_lossy(local.as_ref()).into_owned();

        let parent_wants_child = match self.stack.last_mut() {
            Some(Frame {
                kind: FrameKind::Term {
                    leading,
                    child_text,
                    ..
                },
                ..
            }) => {
                *leading = false;
                child_text.is_none()
            }
            Some(Frame {
                kind: FrameKind::PreferredChild { leading, .. },
                ..
            }) => {
                *leading = false;
                false
            }
            _ => false,
        };

        let kind = if name == self.selector.element {
            let slot = self.emitted + self.pending.len();
            self.pending.push_back(None);
            FrameKind::Term {
                slot,
                text: String::new(),
                leading: true,
                child_text: None,
            }
        } else if name == self.selector.preferred_child {
            if parent_wants_child {
                // Claim the slot so later siblings do not override the first child.
                if let Some(Frame {
                    kind: FrameKind::Term { child_text, .. },
                    ..
                }) = self.stack.last_mut()
                {
                    *child_text = Some(String::new());
                }
            }
            FrameKind::PreferredChild {
                capture: parent_wants_child,
                text: String::new(),
                leading: true,
            }
        } else {
            FrameKind::Other
        };

        self.stack.push(Frame { name, kind });
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return Err(self.error("closing tag without an open element")),
        };

        match frame.kind {
            FrameKind::PreferredChild {
                capture: true,
                text,
                ..
            } => {
                if let Some(Frame {
                    kind: FrameKind::Term { child_text, .. },
                    ..
                }) = self.stack.last_mut()
                {
                    *child_text = Some(text);
                }
            }
            FrameKind::Term {
                slot,
                text,
                child_text,
                ..
            } => {
                let chosen = child_text.unwrap_or(text);
                let trimmed = chosen.trim();
                let resolved = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
                if let Some(entry) = self.pending.get_mut(slot - self.emitted) {
                    *entry = Some(resolved);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn append_text(&mut self, text: &str) {
        match self.stack.last_mut() {
            Some(Frame {
                kind: FrameKind::Term {
                    text: buf,
                    leading: true,
                    ..
                },
                ..
            })
            | Some(Frame {
                kind: FrameKind::PreferredChild {
                    capture: true,
                    text: buf,
                    leading: true,
                },
                ..
            }) => buf.push_str(text),
            _ => {}
        }
    }

    fn in_capture(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::Term { leading: true, .. },
                ..
            }) | Some(Frame {
                kind: FrameKind::PreferredChild {
                    capture: true,
                    leading: true,
                    ..
                },
                ..
            })
        )
    }

    fn step(&mut self) -> Result<(), ExtractError> {
        match self.reader.read_event() {
            Ok(Event::Start(start)) => self.open(&start),
            Ok(Event::Empty(start)) => {
                self.open(&start);
                self.close()?;
            }
            Ok(Event::End(_)) => self.close()?,
            Ok(Event::Text(text)) => {
                if self.in_capture() {
                    let raw = std::str::from_utf8(&text)
                        .map_err(|e| self.error(format!("invalid UTF-8: {e}")))?;
                    let decoded = decode_entities(raw);
                    self.append_text(&decoded);
                }
            }
            Ok(Event::CData(data)) => {
                if self.in_capture() {
                    let raw = std::str::from_utf8(&data)
                        .map_err(|e| self.error(format!("invalid UTF-8: {e}")))?;
                    self.append_text(raw);
                }
            }
            Ok(Event::Eof) => {
                if let Some(frame) = self.stack.last() {
                    let message = format!("unclosed element <{}>", frame.name);
                    return Err(self.error(message));
                }
                self.done = true;
            }
            Ok(_) => {}
            Err(e) => return Err(self.error(e.to_string())),
        }
        Ok(())
    }
}

impl Iterator for Terms<'_> {
    type Item = Result<Term, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(Some(_)) = self.pending.front() {
                self.emitted += 1;
                if let Some(Some(Some(raw))) = self.pending.pop_front() {
                    return Some(Ok(Term::new(raw)));
                }
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.step() {
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(xml: &str) -> Vec<String> {
        Document::new(xml)
            .terms()
            .map(|t| t.unwrap().as_str().to_string())
            .collect()
    }

    #[test]
    fn test_normalize_strips_placeholder_and_sigil() {
        assert_eq!(normalize("ExecStart="), "ExecStart");
        assert_eq!(normalize("Restart=on-failure"), "Restart");
        assert_eq!(normalize("$NOTIFY_SOCKET"), "NOTIFY_SOCKET");
        assert_eq!(normalize("READY=1"), "READY");
        assert_eq!(normalize("plain"), "plain");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for term in ["ExecStart=", "$$DOUBLE", "$X=a=b", "=", "$", "A=$B", ""] {
            let once = normalize(term);
            assert_eq!(normalize(once), once, "not idempotent for {term:?}");
        }
    }

    #[test]
    fn test_varname_child_preferred() {
        let xml = r#"<refentry><variablelist>
            <varlistentry><term><varname>ExecStart=</varname></term></varlistentry>
            <varlistentry><term>ignored <varname>Type=</varname></term></varlistentry>
        </variablelist></refentry>"#;
        assert_eq!(collect(xml), vec!["ExecStart=", "Type="]);
    }

    #[test]
    fn test_first_varname_wins() {
        let xml = "<r><term><varname>A=</varname><varname>B=</varname></term></r>";
        assert_eq!(collect(xml), vec!["A="]);
    }

    #[test]
    fn test_own_text_used_without_varname() {
        let xml = "<r><term>$LISTEN_FDS</term><term>READY=1</term></r>";
        assert_eq!(collect(xml), vec!["$LISTEN_FDS", "READY=1"]);
    }

    #[test]
    fn test_text_after_first_child_is_ignored() {
        let xml = "<r><term><option>--user</option> trailing</term></r>";
        assert!(collect(xml).is_empty());
    }

    #[test]
    fn test_whitespace_only_and_empty_terms_skipped() {
        let xml = "<r><term>   \n  </term><term/><term><varname/></term><term>Kept</term></r>";
        assert_eq!(collect(xml), vec!["Kept"]);
    }

    #[test]
    fn test_empty_varname_does_not_fall_back_to_parent() {
        let xml = "<r><term>Parent<varname>  </varname></term></r>";
        assert!(collect(xml).is_empty());
    }

    #[test]
    fn test_nested_varname_not_direct_child() {
        let xml = "<r><term>Outer<literal><varname>Inner</varname></literal></term></r>";
        assert_eq!(collect(xml), vec!["Outer"]);
    }

    #[test]
    fn test_predefined_entities_decoded_unknown_kept() {
        let xml = "<r><term>A&amp;B</term><term>&systemd;Foo</term></r>";
        assert_eq!(collect(xml), vec!["A&B", "&systemd;Foo"]);
    }

    #[test]
    fn test_cdata_counts_as_text() {
        let xml = "<r><term><![CDATA[Cdata=]]></term></r>";
        assert_eq!(collect(xml), vec!["Cdata="]);
    }

    #[test]
    fn test_namespaced_elements_match_by_local_name() {
        let xml = r#"<db:r xmlns:db="http://docbook.org/ns/docbook"><db:term><db:varname>X=</db:varname></db:term></db:r>"#;
        assert_eq!(collect(xml), vec!["X="]);
    }

    #[test]
    fn test_nested_terms_keep_opening_order() {
        let xml = "<r><term>Outer<term>Inner</term></term><term>Last</term></r>";
        assert_eq!(collect(xml), vec!["Outer", "Inner", "Last"]);
    }

    #[test]
    fn test_sequence_is_restartable() {
        let doc = Document::new("<r><term>A</term><term>B</term></r>");
        let first: Vec<_> = doc.terms().map(|t| t.unwrap()).collect();
        let second: Vec<_> = doc.terms().map(|t| t.unwrap()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        let doc = Document::new("<r><term>A</varname></r>");
        let results: Vec<_> = doc.terms().collect();
        assert!(results.iter().any(|r| r.is_err()));
        assert!(matches!(results.last(), Some(Err(_))));
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let doc = Document::new("<r><term>A</term>");
        let results: Vec<_> = doc.terms().collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().as_str(), "A");
        let err = results[1].as_ref().unwrap_err();
        assert!(err.message.contains("<r>"));
    }

    #[test]
    fn test_custom_selector() {
        let doc = Document::new("<r><dt><code>x</code></dt><dt>y</dt></r>");
        let selector = TermSelector {
            element: "dt",
            preferred_child: "code",
        };
        let terms: Vec<_> = doc
            .terms_matching(selector)
            .map(|t| t.unwrap().as_str().to_string())
            .collect();
        assert_eq!(terms, vec!["x", "y"]);
    }

    #[test]
    fn test_term_key_uses_normalization() {
        let term = Term::new("$MAINPID=");
        assert_eq!(term.key(), "MAINPID");
        assert_eq!(term.to_string(), "$MAINPID=");
    }
}
