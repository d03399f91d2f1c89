//! Tag utilities for entity ingestion.
use osmtab_core::Tags;

/// Deep-copy borrowed decoder tags into an owned map.
///
/// The decoder's string table is released once its block has been
/// visited, so nothing borrowed may outlive the callback.
pub(super) fn collect_tags<'a, T>(tags: T) -> Tags
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut collected = Tags::new();
    for (key, value) in tags {
        collected.insert(key.to_owned(), value.to_owned());
    }
    collected
}
