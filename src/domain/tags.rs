//! Tag extraction from note text
//!
//! Tags come from two places:
//!
//! - the front-matter block at the top of a note, in any of three forms
//!   (`tags: value`, `tags: [a, b]`, or a `tags:` line followed by `- item` lines)
//! - inline `#tag` markers anywhere in the text
//!
//! The three front-matter forms are matched independently. A note that happens
//! to use more than one form contributes tags from each of them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)\A---[ \t]*\r?\n(.*?)^---[ \t]*\r?$").unwrap());
static SCALAR_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*tags:[ \t]*([^\[\]\r\n]+)\r?$").unwrap());
static LIST_TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*tags:[ \t]*\[([^\]\r\n]*)\]").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+(.+)$").unwrap());
static INLINE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_-]+)").unwrap());

/// Which part of a note is scanned for inline `#tags`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineTagScope {
    /// The whole note, front-matter included
    #[default]
    All,
    /// Only the text after the front-matter block
    Body,
    /// No inline scanning
    Off,
}

impl InlineTagScope {
    pub fn as_str(&self) -> &str {
        match self {
            InlineTagScope::All => "all",
            InlineTagScope::Body => "body",
            InlineTagScope::Off => "off",
        }
    }
}

impl std::str::FromStr for InlineTagScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(InlineTagScope::All),
            "body" => Ok(InlineTagScope::Body),
            "off" => Ok(InlineTagScope::Off),
            other => Err(format!(
                "unknown inline tag scope '{}' (expected all, body or off)",
                other
            )),
        }
    }
}

/// Extracts every tag declared by a note
///
/// Front-matter tags come first, then inline tags, each in the order they
/// appear. Duplicates are kept.
pub fn extract_tags(text: &str) -> Vec<String> {
    extract_tags_with(text, InlineTagScope::All)
}

/// Extracts tags, scanning for inline tags only within `scope`
pub fn extract_tags_with(text: &str, scope: InlineTagScope) -> Vec<String> {
    let frontmatter = FRONTMATTER_RE.captures(text);

    let mut tags = match &frontmatter {
        Some(caps) => frontmatter_tags(caps.get(1).map_or("", |m| m.as_str())),
        None => Vec::new(),
    };

    let inline_source = match scope {
        InlineTagScope::All => text,
        InlineTagScope::Body => match &frontmatter {
            Some(caps) => &text[caps.get(0).map_or(0, |m| m.end())..],
            None => text,
        },
        InlineTagScope::Off => "",
    };
    tags.extend(inline_tags(inline_source));

    tags
}

/// Tags from the raw front-matter text, all three forms
fn frontmatter_tags(frontmatter: &str) -> Vec<String> {
    let mut tags = Vec::new();

    for caps in SCALAR_TAGS_RE.captures_iter(frontmatter) {
        let value = caps[1].trim();
        if !value.is_empty() {
            tags.push(value.to_string());
        }
    }

    for caps in LIST_TAGS_RE.captures_iter(frontmatter) {
        tags.extend(
            caps[1]
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from),
        );
    }

    tags.extend(block_list_tags(frontmatter));

    tags
}

/// Tags from `tags:` followed by `- item` lines
fn block_list_tags(frontmatter: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut lines = frontmatter.lines().peekable();

    while let Some(line) = lines.next() {
        if line.trim() != "tags:" {
            continue;
        }

        // The first non-item line ends the block and is left for the outer loop
        while let Some(caps) = lines.peek().copied().and_then(|item| LIST_ITEM_RE.captures(item)) {
            let value = caps[1].trim();
            if !value.is_empty() {
                tags.push(value.to_string());
            }
            lines.next();
        }
    }

    tags
}

fn inline_tags(text: &str) -> impl Iterator<Item = String> + '_ {
    INLINE_TAG_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_list_frontmatter() {
        let text = "---\ntitle: Algebra\ntags: [maths, algebra]\n---\n\nBody text.";
        assert_eq!(extract_tags(text), vec!["maths", "algebra"]);
    }

    #[test]
    fn inline_list_drops_empty_entries() {
        let text = "---\ntags: [ a , , b ,]\n---\n";
        assert_eq!(extract_tags(text), vec!["a", "b"]);
    }

    #[test]
    fn scalar_frontmatter() {
        let text = "---\ntags:   reading list  \n---\nbody";
        assert_eq!(extract_tags(text), vec!["reading list"]);
    }

    #[test]
    fn block_list_frontmatter() {
        let text = "---\ntags:\n  - physics\n  - optics\nauthor: me\n- stray\n---\n";
        assert_eq!(extract_tags(text), vec!["physics", "optics"]);
    }

    #[test]
    fn block_list_with_surrounding_whitespace() {
        let text = "---\n  tags:  \n- one\n- two\n---\n";
        assert_eq!(extract_tags(text), vec!["one", "two"]);
    }

    #[test]
    fn consecutive_block_lists_both_count() {
        let text = "---\ntags:\n- a\ntags:\n- b\n---\n";
        assert_eq!(extract_tags(text), vec!["a", "b"]);
    }

    #[test]
    fn blank_block_items_are_dropped() {
        let text = "---\ntags:\n-  \n- x\n---\n";
        assert_eq!(extract_tags(text), vec!["x"]);
    }

    #[test]
    fn frontmatter_then_inline_order() {
        let text = "---\ntags: [a, b]\n---\nSee #c and #d-e_f.";
        assert_eq!(extract_tags(text), vec!["a", "b", "c", "d-e_f"]);
    }

    #[test]
    fn no_frontmatter_only_inline() {
        let text = "tags: [ignored]\n\nA #note about #rust";
        assert_eq!(extract_tags(text), vec!["note", "rust"]);
    }

    #[test]
    fn frontmatter_must_start_the_text() {
        let text = "\n---\ntags: [late]\n---\n";
        assert!(extract_tags(text).is_empty());
    }

    #[test]
    fn unterminated_frontmatter_is_ignored() {
        let text = "---\ntags: [open]\nno closing line";
        assert!(extract_tags(text).is_empty());
    }

    #[test]
    fn no_tags_anywhere() {
        assert!(extract_tags("Just some text.\n\nNothing here.").is_empty());
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let text = "---\ntags: [x]\n---\n#x #x";
        assert_eq!(extract_tags(text), vec!["x", "x", "x"]);
    }

    #[test]
    fn crlf_scalar_and_block_list() {
        let text = "---\r\ntags: solo\r\n---\r\n";
        assert_eq!(extract_tags(text), vec!["solo"]);

        let text = "---\r\ntags:\r\n- one\r\n- two\r\n---\r\n";
        assert_eq!(extract_tags(text), vec!["one", "two"]);
    }

    #[test]
    fn crlf_frontmatter() {
        let text = "---\r\ntags: [win]\r\n---\r\nbody #crlf\r\n";
        assert_eq!(extract_tags(text), vec!["win", "crlf"]);
    }

    // Overlapping front-matter forms all contribute. This documents the
    // current behavior rather than a stricter YAML reading.
    #[test]
    fn overlapping_frontmatter_forms_all_contribute() {
        let text = "---\ntags: [a, b]\ntags: c\ntags:\n- d\n---\n";
        assert_eq!(extract_tags(text), vec!["c", "a", "b", "d"]);
    }

    // Inline scanning sees every `#`, including URL fragments and front-matter.
    #[test]
    fn inline_scan_overmatches_by_default() {
        let text = "---\nsource: https://example.com/page#section\n---\nbody";
        assert_eq!(extract_tags(text), vec!["section"]);
    }

    #[test]
    fn body_scope_skips_frontmatter() {
        let text = "---\nsource: https://example.com/page#section\ntags: [x]\n---\n#real";
        assert_eq!(
            extract_tags_with(text, InlineTagScope::Body),
            vec!["x", "real"]
        );
    }

    #[test]
    fn off_scope_only_frontmatter() {
        let text = "---\ntags: [x]\n---\n#ignored";
        assert_eq!(extract_tags_with(text, InlineTagScope::Off), vec!["x"]);
    }

    #[test]
    fn heading_markers_are_not_tags() {
        let text = "# Title\n## Section\nText";
        assert!(extract_tags(text).is_empty());
    }

    #[test]
    fn scope_from_str() {
        assert_eq!("body".parse::<InlineTagScope>(), Ok(InlineTagScope::Body));
        assert!("nope".parse::<InlineTagScope>().is_err());
    }
}
