//! Wikilink extraction from hub text

use std::collections::HashSet;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";
const ALIAS: char = '|';

/// Returns the names of every note a text already links to
///
/// Each `[[target]]` or `[[target|alias]]` yields `target`, trimmed. An
/// opening `[[` without a following `]]` is ignored.
pub fn extract_links(text: &str) -> HashSet<String> {
    let mut links = HashSet::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        let inner = &after_open[..end];
        let target = inner.split(ALIAS).next().unwrap_or(inner).trim();
        if !target.is_empty() {
            links.insert(target.to_string());
        }

        rest = &after_open[end + CLOSE.len()..];
    }

    links
}
