//! Pattern text handling: separator normalization, locating the first
//! wildcard segment, and compiling a segment into a name matcher.

use std::ffi::OsStr;
use std::path::MAIN_SEPARATOR;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::WildpathError;

/// Characters that make a segment a wildcard segment.
pub const WILDCARDS: [char; 2] = ['*', '?'];

/// Returns `true` if `pattern` contains `*` or `?` anywhere.
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

// ---------------------------------------------------------------------------
// normalize()
// ---------------------------------------------------------------------------

/// Canonicalize separators and drive-colon notation.
///
/// `C:Windows` becomes `C:<sep>Windows`, runs of separators collapse into
/// one. On Windows `/` is rewritten to `\` first. Pure string rewriting.
pub fn normalize(pattern: &str) -> String {
    let pattern: String = if cfg!(windows) {
        pattern.replace('/', "\\")
    } else {
        pattern.to_owned()
    };

    let mut out = String::with_capacity(pattern.len() + 1);
    let mut prev_sep = false;
    for (i, c) in pattern.chars().enumerate() {
        if c == MAIN_SEPARATOR {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
            continue;
        }
        prev_sep = false;
        out.push(c);
        if i == 1 && c == ':' && is_drive_char(pattern.chars().next()) {
            out.push(MAIN_SEPARATOR);
            prev_sep = true;
        }
    }
    out
}

fn is_drive_char(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_ascii_alphabetic() || WILDCARDS.contains(&c))
}

// ---------------------------------------------------------------------------
// split()
// ---------------------------------------------------------------------------

/// A pattern broken around its first wildcard segment.
///
/// `left` is wildcard free (empty means "current directory"), `segment` is
/// exactly one path component holding the wildcard, `right` is whatever
/// follows it and may hold further wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub left:    &'a str,
    pub segment: &'a str,
    pub right:   &'a str,
}

/// Result of scanning a pattern once for wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parsed<'a> {
    /// No wildcard anywhere: the pattern is a concrete path.
    Literal(&'a str),

    /// At least one wildcard: resolved by listing `left`.
    Wildcard(Split<'a>),
}

/// Scan `pattern` for its first wildcard and classify it.
pub fn parse(pattern: &str) -> Parsed<'_> {
    match pattern.find(WILDCARDS) {
        None => Parsed::Literal(pattern),
        Some(idx) => Parsed::Wildcard(split_at(pattern, idx)),
    }
}

/// Split `pattern` into `(left, segment, right)`.
///
/// Without a wildcard the whole input is `left`.
pub fn split(pattern: &str) -> Split<'_> {
    match parse(pattern) {
        Parsed::Literal(left) => Split { left, segment: "", right: "" },
        Parsed::Wildcard(split) => split,
    }
}

fn split_at(pattern: &str, wildcard: usize) -> Split<'_> {
    let (left, seg_start) = match pattern[..wildcard].rfind(MAIN_SEPARATOR) {
        // Keep the separator when it is the root, `/x*` or `C:\x*`.
        Some(i) if i == 0 || pattern[..i].ends_with(':') => (&pattern[..=i], i + 1),
        Some(i) => (&pattern[..i], i + 1),
        None => ("", 0),
    };

    let (segment, right) = match pattern[wildcard..].find(MAIN_SEPARATOR) {
        Some(j) => {
            let end = wildcard + j;
            (&pattern[seg_start..end], &pattern[end + 1..])
        }
        None => (&pattern[seg_start..], ""),
    };

    Split { left, segment, right }
}

// ---------------------------------------------------------------------------
// SegmentMatcher
// ---------------------------------------------------------------------------

/// Compiled matcher for one wildcard segment.
///
/// Only `*` and `?` are special. Anything `globset` would otherwise treat
/// as syntax (`[`, `{`, `\` ...) is escaped and matches literally.
/// Case sensitivity follows the host: insensitive on Windows.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    matcher: GlobMatcher,
}

impl SegmentMatcher {
    pub fn new(segment: &str) -> Result<Self, WildpathError> {
        let mut glob = String::with_capacity(segment.len() * 2);
        for c in segment.chars() {
            if matches!(c, '[' | ']' | '{' | '}' | ',' | '\\' | '!') {
                glob.push('\\');
            }
            glob.push(c);
        }

        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(true)
            .case_insensitive(cfg!(windows))
            .build()
            .map_err(|e| WildpathError::InvalidPattern(format!("{segment}: {e}")))?
            .compile_matcher();

        Ok(Self { matcher })
    }

    /// Match a single directory entry name.
    pub fn is_match(&self, name: &OsStr) -> bool {
        self.matcher.is_match(name)
    }
}
