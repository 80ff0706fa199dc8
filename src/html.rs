use once_cell::sync::Lazy;
use regex::Regex;

static PRE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<pre\b[^>]*>(.*?)</pre>").unwrap());

/// Text content of every `<pre>` element, in document order, trimmed.
pub fn pre_texts(html: &str) -> Vec<String> {
    PRE_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| unescape(m.as_str().trim()))
        .collect()
}

/// Decode the handful of entities the export pages actually emit.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
