use std::io::Write;

use biblatex::Entry;

use crate::{
    extract,
    resolver::{self, SourceFn},
};

/// Per-run tally, reported on stderr once the document is done.
#[derive(Debug, Default, Clone, Copy)]
pub struct Outcome {
    pub written: usize,
    pub skipped: usize,
}

/// Drives one document pass: extract citation pairs, resolve each URL through
/// the source chain, and serialize every hit to `out` as soon as it lands.
pub struct Converter {
    sources: &'static [SourceFn],
}

impl Converter {
    /// A converter over the given source chain; `resolver::SOURCES` for the
    /// real one.
    pub fn new(sources: &'static [SourceFn]) -> Self {
        Converter { sources }
    }

    /// Translate a citation URL list to a BibTeX document.
    ///
    /// Citations whose URL no source can place are left out of the output
    /// without comment. Output already written stays written; a malformed
    /// vendor entry or a transport failure aborts the rest of the pass.
    pub fn convert<W: Write>(&self, text: &str, out: &mut W) -> anyhow::Result<Outcome> {
        let mut outcome = Outcome::default();
        for pair in extract::citations(text) {
            match resolver::resolve(self.sources, pair.url)? {
                Some(entry) => {
                    writeln!(out, "{}", keyed(entry, pair.key).to_biblatex_string())?;
                    outcome.written += 1;
                }
                None => outcome.skipped += 1,
            }
        }
        Ok(outcome)
    }
}

/// Re-key an entry under the citation key it was declared with.
fn keyed(mut entry: Entry, key: &str) -> Entry {
    entry.key = key.to_string();
    entry
}
