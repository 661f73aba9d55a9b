//! Section merging for hub documents
//!
//! A link line is inserted directly under the first line that exactly matches
//! the configured heading. When no such line exists the heading is appended
//! to the end of the document together with the link line.
//!
//! Merging never checks for duplicates. Callers consult
//! [`extract_links`](super::extract_links) first.

use regex::{NoExpand, Regex};

/// Builds the line-anchored pattern for a heading
///
/// Heading text is escaped, so characters like `(`, `*` or `$` in a
/// user-configured heading match literally. Trailing whitespace on the hub
/// line (including `\r`) is tolerated.
pub fn heading_pattern(heading: &str) -> Regex {
    let pattern = format!(r"(?m)^{}[^\S\n]*$", regex::escape(heading.trim_end()));
    Regex::new(&pattern).expect("escaped heading is a valid pattern")
}

/// Inserts `link_line` under `heading`, creating the section if needed
pub fn merge(hub_text: &str, heading: &str, link_line: &str) -> String {
    let heading = heading.trim_end();
    let pattern = heading_pattern(heading);

    if pattern.is_match(hub_text) {
        let replacement = format!("{}\n{}", heading, link_line);
        pattern
            .replacen(hub_text, 1, NoExpand(&replacement))
            .into_owned()
    } else {
        format!("{}\n\n{}\n{}", hub_text, heading, link_line)
    }
}
