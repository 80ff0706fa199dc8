use biblatex::Entry;

pub mod acm;

/// A citation source: a site we know how to turn URLs into bibliography
/// entries for.
///
/// `parse` is pure recognition; it never touches the network. `resolve` does
/// the lookup and distinguishes "recognized, but nothing usable there"
/// (`Ok(None)`, the chain moves on) from malformed vendor data (`Err`, the
/// whole run stops).
pub trait Source<'a>: 'a {
    fn parse(url: &'a str) -> Option<Box<Self>>
    where
        Self: Sized;
    fn resolve(&self) -> anyhow::Result<Option<Entry>>;
}
