use biblatex::Entry;

use crate::source::{Source, acm::Acm};

/// Recognition function of one source, with its concrete type erased.
pub type SourceFn = for<'a> fn(&'a str) -> Option<Box<dyn Source<'a> + 'a>>;

/// Known citation sources, in lookup order.
///
/// NOTE: Ordering is priority. The first source to recognize a URL handles
/// it; adding a new source means appending here, nothing else changes.
pub static SOURCES: &[SourceFn] = &[erase::<Acm>()];

// Use GAT because we don't have higher-kinded types in Rust (sad)
pub trait SourceFamily {
    type For<'a>: Source<'a>;
}

/// Get the recognition method of a source `F` and erase its type so a single
/// list can hold every source.
pub const fn erase<F: SourceFamily>() -> SourceFn {
    // A generic function item, still polymorphic in 'a.
    fn call<'a, G: SourceFamily>(url: &'a str) -> Option<Box<dyn Source<'a> + 'a>> {
        <G::For<'a> as Source<'a>>::parse(url).map(|x| x as Box<dyn Source<'a> + 'a>)
    }

    // Force coercion to the HRTB fn-pointer type.
    let f: SourceFn = call::<F>;
    f
}

/// Try each source in order; the first one that recognizes the URL and finds
/// an entry wins. `Ok(None)` means no source could place the URL, which is
/// not an error.
pub fn resolve(sources: &[SourceFn], url: &str) -> anyhow::Result<Option<Entry>> {
    for parse in sources {
        if let Some(source) = parse(url)
            && let Some(entry) = source.resolve()?
        {
            return Ok(Some(entry));
        }
    }
    Ok(None)
}
