//! Entity decoding for man-page text
//!
//! The systemd man pages pull their custom entities (`&systemd;`, `&fstab;`)
//! from an external DTD that is never loaded, so unknown references stay in
//! the text verbatim instead of failing the whole page.

use quick_xml::escape::resolve_predefined_entity;
use std::borrow::Cow;

/// Decode predefined and numeric character references, keep the rest.
pub fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) => {
                let name = &after[..semi];
                match resolve(name) {
                    Some(Resolved::Str(s)) => out.push_str(s),
                    Some(Resolved::Char(c)) => out.push(c),
                    None => {
                        out.push('&');
                        out.push_str(name);
                        out.push(';');
                    }
                }
                rest = &after[semi + 1..];
            }
            None => {
                out.push_str(&rest[amp..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

enum Resolved {
    Str(&'static str),
    Char(char),
}

fn resolve(name: &str) -> Option<Resolved> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(Resolved::Char);
    }
    resolve_predefined_entity(name).map(Resolved::Str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(decode_entities("ExecStart="), Cow::Borrowed(_)));
    }

    #[test]
    fn test_predefined_and_numeric() {
        assert_eq!(decode_entities("a&lt;b&gt;&amp;&quot;&apos;"), "a<b>&\"'");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
    }

    #[test]
    fn test_unknown_and_dangling_kept() {
        assert_eq!(decode_entities("&systemd; x"), "&systemd; x");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }
}
