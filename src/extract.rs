use once_cell::sync::Lazy;
use regex::Regex;

/// A citation declaration line: `[@key]: url`.
static CITE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[@([^\]]+)\]:\s*(.*)$").unwrap());

/// One `(key, url)` pair taken from a declaration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationPair<'a> {
    pub key: &'a str,
    pub url: &'a str,
}

/// Lazily scan `text` for citation declarations, top to bottom.
///
/// Lines that don't match the pattern are inert; they may be prose, headers,
/// anything. Absence of a match is not a failure.
pub fn citations(text: &str) -> impl Iterator<Item = CitationPair<'_>> {
    text.lines().filter_map(|line| {
        let caps = CITE_RE.captures(line)?;
        Some(CitationPair {
            key: caps.get(1)?.as_str(),
            url: caps.get(2)?.as_str().trim(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_pairs_in_line_order() {
        let text = "# Notes\n\
                    [@threads]: http://dl.acm.org/citation.cfm?id=1065042\n\
                    some prose in between\n\
                    [@other]: https://example.com/paper   \n";
        let pairs: Vec<_> = citations(text).collect();
        assert_eq!(
            pairs,
            vec![
                CitationPair {
                    key: "threads",
                    url: "http://dl.acm.org/citation.cfm?id=1065042",
                },
                CitationPair {
                    key: "other",
                    url: "https://example.com/paper",
                },
            ]
        );
    }

    #[test]
    fn url_is_trimmed() {
        let pairs: Vec<_> = citations("[@a]:    https://example.com \t").collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].url, "https://example.com");
    }

    #[test]
    fn non_matching_lines_yield_nothing() {
        for text in [
            "",
            "just prose",
            "[@unclosed: https://example.com",
            "  [@indented]: https://example.com",
            "[not-a-citation]: https://example.com",
        ] {
            assert_eq!(citations(text).count(), 0, "should yield nothing for {text:?}");
        }
    }

    #[test]
    fn extraction_keeps_matching_lines_only() {
        proptest::proptest!(|(
            keys in proptest::collection::vec("[A-Za-z0-9_-]{1,12}", 1..8),
            prose in proptest::collection::vec("[a-z ]{0,40}", 0..8),
        )| {
            let mut text = String::new();
            for (i, key) in keys.iter().enumerate() {
                if let Some(p) = prose.get(i) {
                    // Prose never matches: a declaration must start with "[@".
                    text.push_str(p);
                    text.push('\n');
                }
                text.push_str(&format!("[@{key}]: https://example.com/{i}\n"));
            }
            let pairs: Vec<_> = citations(&text).collect();
            proptest::prop_assert_eq!(pairs.len(), keys.len());
            for (pair, key) in pairs.iter().zip(&keys) {
                proptest::prop_assert_eq!(pair.key, key);
            }
        })
    }
}
