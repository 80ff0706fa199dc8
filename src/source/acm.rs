use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use biblatex::{Bibliography, ChunksExt, Entry, EntryType};
use url::Url;

use crate::{html, resolver::SourceFamily, source::Source};

const EXPORT_ENDPOINT: &str = "http://dl.acm.org/exportformats.cfm";

/// ACM Digital Library citation pages (`dl.acm.org/citation.cfm?id=...`).
///
/// Resolution scrapes the vendor's BibTeX export page for the citation id,
/// picks the right entry when several are offered, and simplifies it.
pub struct Acm {
    id: String,
}

impl<'a> Source<'a> for Acm {
    fn parse(url: &'a str) -> Option<Box<Self>> {
        let url = Url::parse(url).ok()?;
        if url.host_str() != Some("dl.acm.org") || url.path() != "/citation.cfm" {
            return None;
        }
        let id = url
            .query_pairs()
            .find(|(name, _)| name == "id")
            .map(|(_, value)| value.into_owned())?;
        Some(Box::new(Acm { id }))
    }

    fn resolve(&self) -> anyhow::Result<Option<Entry>> {
        let body = fetch_export(&self.id)?;
        entry_from_export(&body)
    }
}

impl SourceFamily for Acm {
    type For<'a> = Acm;
}

fn fetch_export(id: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(EXPORT_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("id", id)
        .append_pair("expformat", "bibtex");

    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(5)))
        .timeout_global(Some(Duration::from_secs(15)))
        .build();
    let agent = ureq::Agent::new_with_config(config);
    let res = agent
        .get(url.as_str())
        .header("User-Agent", "Mozilla/5.0 (compatible; imbib/0.1)")
        .call()
        .with_context(|| format!("failed request for ACM citation {id}"))?;
    res.into_body().read_to_string().context("read body")
}

/// Reduce an export page to the one entry worth keeping, if any.
///
/// Each `<pre>` block on the page is an independent BibTeX document; the
/// vendor puts one entry per block, so anything after the first entry of a
/// block is ignored. An unparseable block is vendor-format drift and aborts
/// the run.
pub(crate) fn entry_from_export(body: &str) -> anyhow::Result<Option<Entry>> {
    let mut candidates = Vec::new();
    for block in html::pre_texts(body) {
        let bib = Bibliography::parse(&block)
            .map_err(|e| anyhow!("invalid BibTeX in export block: {e}"))?;
        if let Some(entry) = bib.iter().next().cloned() {
            candidates.push(entry);
        }
    }
    match select(candidates) {
        Some(entry) => simplify(entry).map(Some),
        None => Ok(None),
    }
}

/// Pick one entry out of the export candidates.
///
/// Multiple options usually mean the conference also publishes a
/// "notices"-style journal, which is never the right thing to cite; the
/// `inproceedings` form wins whenever present, otherwise the first candidate.
fn select(candidates: Vec<Entry>) -> Option<Entry> {
    if candidates.len() > 1
        && let Some(entry) = candidates
            .iter()
            .find(|e| matches!(e.entry_type, EntryType::InProceedings))
    {
        return Some(entry.clone());
    }
    candidates.into_iter().next()
}

/// Produce a simpler, less-wrong entry.
///
/// For conference proceedings the usable conference name hides in the
/// `series` field, conventionally "<Acronym> <Year-or-edition>"; only the
/// first token survives, as `booktitle`. Everything except title, year,
/// booktitle and the persons is dropped on purpose.
///
/// TODO: simplify journals and such.
fn simplify(entry: Entry) -> anyhow::Result<Entry> {
    if !matches!(entry.entry_type, EntryType::InProceedings) {
        return Ok(entry);
    }

    let title = field(&entry, "title")?;
    let year = field(&entry, "year")?;
    let series = field(&entry, "series")?;
    let mut tokens = series.split_whitespace();
    let booktitle = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(acronym), Some(_), None) => acronym.to_string(),
        _ => bail!(
            "entry {}: series {series:?} is not of the form \"ACRONYM EDITION\"",
            entry.key
        ),
    };

    let mut fields: Vec<(&str, String)> =
        vec![("title", title), ("year", year), ("booktitle", booktitle)];
    for role in ["author", "editor"] {
        if let Some(chunks) = entry.get(role) {
            fields.push((role, chunks.format_verbatim()));
        }
    }

    let mut out = String::new();
    out.push_str("@inproceedings{");
    out.push_str(&entry.key);
    out.push_str(",\n");
    for (name, value) in fields {
        out.push_str("    ");
        out.push_str(name);
        out.push_str(" = {");
        out.push_str(&escape_braces(&value));
        out.push_str("},\n");
    }
    out.push_str("}\n");

    let bib = Bibliography::parse(&out)
        .map_err(|e| anyhow!("failed to parse simplified entry {}: {e}", entry.key))?;
    bib.iter()
        .next()
        .cloned()
        .ok_or_else(|| anyhow!("empty bibliography after simplifying {}", entry.key))
}

fn field(entry: &Entry, name: &str) -> anyhow::Result<String> {
    entry
        .get(name)
        .map(|chunks| chunks.format_verbatim())
        .ok_or_else(|| anyhow!("entry {} has no {name} field", entry.key))
}

fn escape_braces(s: &str) -> String {
    s.replace('{', "\\{").replace('}', "\\}")
}
